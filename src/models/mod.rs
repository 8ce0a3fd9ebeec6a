pub mod contest;
pub mod judgehost;
pub mod judging;
pub mod rejudging;
pub mod scoreboard;
pub mod submission;

pub use contest::{Contest, ContestProblem, FreezeData, RemovedInterval};
pub use judgehost::{Judgehost, JudgehostHealth, JudgehostRestriction};
pub use judging::{Judging, JudgingRun};
pub use rejudging::{Rejudging, RejudgingSelector};
pub use scoreboard::{
    Balloon, DisabledTarget, InternalError, RankCacheRow, ScoreCacheCell,
};
pub use submission::{Language, Problem, Submission, Team, Testcase};
