pub mod group;
pub mod schedule;
pub mod time;

pub use group::{LeaderChange, NewStudentGroup};
pub use schedule::{MergedSchedule, NewSchedule, ScheduleEntry, SchedulePatch};
pub use time::{AcademicTerm, CalendarTimestamp, YearMonth, TIMESTAMP_FORMAT};
