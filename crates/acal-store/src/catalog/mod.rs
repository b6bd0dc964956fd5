//! Read-only query catalog
//!
//! Every query the dispatcher can run is declared here once: its SQL, the
//! kind of each positional parameter, and the columns it yields. SQL text is
//! static; caller input only ever reaches the store as bound parameters.
//!
//! Parameter numbering: caller parameters come first (`?1..?n`), then the
//! reporting term when the entry uses it (`?n+1`), then any optional
//! predicate appended by [`QueryBuilder`].

pub mod builder;

pub use builder::QueryBuilder;

use acal_core::errors::InputError;
use std::fmt;

/// Declared kind of a positional parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    Integer,
    /// `YYYY-MM` text, bound as the first day of that month
    YearMonth,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Text => write!(f, "text"),
            ParamKind::Integer => write!(f, "integer"),
            ParamKind::YearMonth => write!(f, "year-month (YYYY-MM)"),
        }
    }
}

/// A named positional parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
}

const fn param(name: &'static str, kind: ParamKind) -> ParamSpec {
    ParamSpec { name, kind }
}

/// A predicate appended only when its argument is supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionalPredicate {
    pub param: ParamSpec,
    /// Left-hand side and operator, e.g. `s.student_id =`
    pub lhs: &'static str,
}

/// Stable identifiers for catalog entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryId {
    StudentsByDepartment,
    GroupsByPurpose,
    CourseStatsByTerm,
    CoEnrollment,
    StudentsWithSchedule,
    CourseLookupByCodes,
    PopularCourses,
    DepartmentEventsByMonth,
    SectionEnrollmentRanking,
    StudentCreditRanking,
    EnrolledUnion,
    EnrolledDifference,
    EnrolledIntersection,
    StudentSchedules,
}

impl QueryId {
    pub const ALL: [QueryId; 14] = [
        QueryId::StudentsByDepartment,
        QueryId::GroupsByPurpose,
        QueryId::CourseStatsByTerm,
        QueryId::CoEnrollment,
        QueryId::StudentsWithSchedule,
        QueryId::CourseLookupByCodes,
        QueryId::PopularCourses,
        QueryId::DepartmentEventsByMonth,
        QueryId::SectionEnrollmentRanking,
        QueryId::StudentCreditRanking,
        QueryId::EnrolledUnion,
        QueryId::EnrolledDifference,
        QueryId::EnrolledIntersection,
        QueryId::StudentSchedules,
    ];

    /// Snake-case name used in logs and on the command line
    pub fn name(&self) -> &'static str {
        self.entry().name
    }

    /// Catalog number; 1 to 13 double as top-level menu selections
    pub fn number(&self) -> u8 {
        match self {
            QueryId::StudentsByDepartment => 1,
            QueryId::GroupsByPurpose => 2,
            QueryId::CourseStatsByTerm => 3,
            QueryId::CoEnrollment => 4,
            QueryId::StudentsWithSchedule => 5,
            QueryId::CourseLookupByCodes => 6,
            QueryId::PopularCourses => 7,
            QueryId::DepartmentEventsByMonth => 8,
            QueryId::SectionEnrollmentRanking => 9,
            QueryId::StudentCreditRanking => 10,
            QueryId::EnrolledUnion => 11,
            QueryId::EnrolledDifference => 12,
            QueryId::EnrolledIntersection => 13,
            QueryId::StudentSchedules => 14,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.number() == number)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    pub fn entry(&self) -> &'static CatalogEntry {
        match self {
            QueryId::StudentsByDepartment => &STUDENTS_BY_DEPARTMENT,
            QueryId::GroupsByPurpose => &GROUPS_BY_PURPOSE,
            QueryId::CourseStatsByTerm => &COURSE_STATS_BY_TERM,
            QueryId::CoEnrollment => &CO_ENROLLMENT,
            QueryId::StudentsWithSchedule => &STUDENTS_WITH_SCHEDULE,
            QueryId::CourseLookupByCodes => &COURSE_LOOKUP_BY_CODES,
            QueryId::PopularCourses => &POPULAR_COURSES,
            QueryId::DepartmentEventsByMonth => &DEPARTMENT_EVENTS_BY_MONTH,
            QueryId::SectionEnrollmentRanking => &SECTION_ENROLLMENT_RANKING,
            QueryId::StudentCreditRanking => &STUDENT_CREDIT_RANKING,
            QueryId::EnrolledUnion => &ENROLLED_UNION,
            QueryId::EnrolledDifference => &ENROLLED_DIFFERENCE,
            QueryId::EnrolledIntersection => &ENROLLED_INTERSECTION,
            QueryId::StudentSchedules => &STUDENT_SCHEDULES,
        }
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One read-only query definition
#[derive(Debug)]
pub struct CatalogEntry {
    pub id: QueryId,
    pub name: &'static str,
    /// Menu label
    pub title: &'static str,
    /// Base statement; complete unless `optional` or `order_by` is set
    pub sql: &'static str,
    /// Caller-supplied positional parameters, in order
    pub params: &'static [ParamSpec],
    /// Whether the configured reporting term is bound after `params`
    pub binds_reporting_term: bool,
    pub optional: Option<OptionalPredicate>,
    /// Appended after any optional predicate
    pub order_by: Option<&'static str>,
    pub columns: &'static [&'static str],
}

impl CatalogEntry {
    /// Fewest and most caller arguments accepted
    pub fn arity(&self) -> (usize, usize) {
        let required = self.params.len();
        (required, required + usize::from(self.optional.is_some()))
    }

    /// Reject an argument count outside [`CatalogEntry::arity`]
    ///
    /// # Errors
    /// `ArityMismatch` naming the nearest accepted count.
    pub fn check_arity(&self, supplied: usize) -> Result<(), InputError> {
        let (min, max) = self.arity();
        if (min..=max).contains(&supplied) {
            return Ok(());
        }
        Err(InputError::ArityMismatch {
            query: self.name.to_string(),
            expected: if supplied < min { min } else { max },
            actual: supplied,
        })
    }
}

/// Name projection of "enrolled in course ?n", shared by the set operations
macro_rules! enrolled_names {
    ($n:literal) => {
        concat!(
            "SELECT s.name AS name FROM student s ",
            "JOIN takes t ON s.student_id = t.student_id ",
            "WHERE t.course_id = ?",
            $n
        )
    };
}

const COURSE_PAIR: &[ParamSpec] = &[
    param("course_a", ParamKind::Text),
    param("course_b", ParamKind::Text),
];

static STUDENTS_BY_DEPARTMENT: CatalogEntry = CatalogEntry {
    id: QueryId::StudentsByDepartment,
    name: "students_by_department",
    title: "Students by department",
    sql: "SELECT student_id, name FROM student WHERE dept_id = ?1 ORDER BY student_id",
    params: &[param("dept_id", ParamKind::Text)],
    binds_reporting_term: false,
    optional: None,
    order_by: None,
    columns: &["student_id", "name"],
};

static GROUPS_BY_PURPOSE: CatalogEntry = CatalogEntry {
    id: QueryId::GroupsByPurpose,
    name: "groups_by_purpose",
    title: "Study groups by purpose",
    sql: "SELECT sg.g_name AS g_name, s.name AS name \
          FROM student_group sg JOIN student s ON sg.leader = s.student_id \
          WHERE sg.purpose = ?1 \
          ORDER BY sg.group_id",
    params: &[param("purpose", ParamKind::Text)],
    binds_reporting_term: false,
    optional: None,
    order_by: None,
    columns: &["g_name", "name"],
};

static COURSE_STATS_BY_TERM: CatalogEntry = CatalogEntry {
    id: QueryId::CourseStatsByTerm,
    name: "course_stats_by_term",
    title: "Enrollment count per course for a term",
    sql: "SELECT c.title AS title, COUNT(t.student_id) AS cnt \
          FROM course c \
          JOIN section se ON c.course_id = se.course_id \
          JOIN takes t ON se.course_id = t.course_id AND se.section_id = t.section_id \
          WHERE se.academic_term = ?1 \
          GROUP BY c.title \
          ORDER BY cnt DESC, c.title",
    params: &[param("term", ParamKind::Integer)],
    binds_reporting_term: false,
    optional: None,
    order_by: None,
    columns: &["title", "cnt"],
};

static CO_ENROLLMENT: CatalogEntry = CatalogEntry {
    id: QueryId::CoEnrollment,
    name: "co_enrollment",
    title: "Students taking both courses (nested membership test)",
    sql: "SELECT s.name AS name \
          FROM student s JOIN takes t ON s.student_id = t.student_id \
          WHERE t.course_id = ?1 \
          AND t.student_id IN ( \
              SELECT t_sub.student_id FROM takes t_sub WHERE t_sub.course_id = ?2 \
          ) \
          ORDER BY s.name",
    params: COURSE_PAIR,
    binds_reporting_term: false,
    optional: None,
    order_by: None,
    columns: &["name"],
};

static STUDENTS_WITH_SCHEDULE: CatalogEntry = CatalogEntry {
    id: QueryId::StudentsWithSchedule,
    name: "students_with_schedule",
    title: "Students with at least one schedule entry",
    sql: "SELECT s.student_id AS student_id, s.name AS name \
          FROM student s \
          WHERE EXISTS (SELECT 1 FROM schedule sc WHERE sc.student_id = s.student_id)",
    params: &[],
    binds_reporting_term: false,
    optional: Some(OptionalPredicate {
        param: param("student_id", ParamKind::Text),
        lhs: "s.student_id =",
    }),
    order_by: Some("s.student_id"),
    columns: &["student_id", "name"],
};

static COURSE_LOOKUP_BY_CODES: CatalogEntry = CatalogEntry {
    id: QueryId::CourseLookupByCodes,
    name: "course_lookup_by_codes",
    title: "Course title and credits for three course codes",
    sql: "SELECT title, credits FROM course \
          WHERE course_id IN (?1, ?2, ?3) \
          ORDER BY course_id",
    params: &[
        param("course_1", ParamKind::Text),
        param("course_2", ParamKind::Text),
        param("course_3", ParamKind::Text),
    ],
    binds_reporting_term: false,
    optional: None,
    order_by: None,
    columns: &["title", "credits"],
};

static POPULAR_COURSES: CatalogEntry = CatalogEntry {
    id: QueryId::PopularCourses,
    name: "popular_courses",
    title: "Courses with at least N students in the reporting term",
    sql: "SELECT title, student_count FROM ( \
              SELECT c.title AS title, COUNT(t.student_id) AS student_count \
              FROM course c \
              JOIN section s ON c.course_id = s.course_id \
              JOIN takes t ON s.course_id = t.course_id AND s.section_id = t.section_id \
              WHERE s.academic_term = ?2 \
              GROUP BY c.title \
          ) \
          WHERE student_count >= ?1 \
          ORDER BY student_count DESC, title",
    params: &[param("min_count", ParamKind::Integer)],
    binds_reporting_term: true,
    optional: None,
    order_by: None,
    columns: &["title", "student_count"],
};

static DEPARTMENT_EVENTS_BY_MONTH: CatalogEntry = CatalogEntry {
    id: QueryId::DepartmentEventsByMonth,
    name: "department_events_by_month",
    title: "Department events in a month",
    sql: "SELECT d.dept_name AS dept_name, de.title AS title, \
                 date(de.start_date) AS start_date, dl.location AS location \
          FROM department d \
          JOIN department_event de ON d.dept_id = de.department_id \
          JOIN dept_location dl ON de.dept_event_id = dl.dept_event_id \
          WHERE de.start_date >= date(?1) \
            AND de.start_date < date(?1, '+1 month') \
          ORDER BY de.start_date, de.dept_event_id",
    params: &[param("year_month", ParamKind::YearMonth)],
    binds_reporting_term: false,
    optional: None,
    order_by: None,
    columns: &["dept_name", "title", "start_date", "location"],
};

static SECTION_ENROLLMENT_RANKING: CatalogEntry = CatalogEntry {
    id: QueryId::SectionEnrollmentRanking,
    name: "section_enrollment_ranking",
    title: "Sections ranked by enrollment in the reporting term",
    sql: "SELECT se.course_id AS course_id, se.section_id AS section_id, \
                 COUNT(t.student_id) AS student_count \
          FROM section se \
          JOIN takes t ON se.course_id = t.course_id AND se.section_id = t.section_id \
          WHERE se.academic_term = ?1 \
          GROUP BY se.course_id, se.section_id \
          ORDER BY student_count DESC, se.course_id, se.section_id",
    params: &[],
    binds_reporting_term: true,
    optional: None,
    order_by: None,
    columns: &["course_id", "section_id", "student_count"],
};

static STUDENT_CREDIT_RANKING: CatalogEntry = CatalogEntry {
    id: QueryId::StudentCreditRanking,
    name: "student_credit_ranking",
    title: "Top 20 students by credits in the reporting term",
    sql: "SELECT s.name AS name, SUM(c.credits) AS total_credits \
          FROM student s \
          JOIN takes t ON s.student_id = t.student_id \
          JOIN section se ON t.course_id = se.course_id AND t.section_id = se.section_id \
          JOIN course c ON se.course_id = c.course_id \
          WHERE se.academic_term = ?1 \
          GROUP BY s.student_id, s.name \
          ORDER BY total_credits DESC, s.name \
          LIMIT 20",
    params: &[],
    binds_reporting_term: true,
    optional: None,
    order_by: None,
    columns: &["name", "total_credits"],
};

static ENROLLED_UNION: CatalogEntry = CatalogEntry {
    id: QueryId::EnrolledUnion,
    name: "enrolled_union",
    title: "Students in course A or course B (UNION)",
    sql: concat!(
        enrolled_names!("1"),
        " UNION ",
        enrolled_names!("2"),
        " ORDER BY name"
    ),
    params: COURSE_PAIR,
    binds_reporting_term: false,
    optional: None,
    order_by: None,
    columns: &["name"],
};

static ENROLLED_DIFFERENCE: CatalogEntry = CatalogEntry {
    id: QueryId::EnrolledDifference,
    name: "enrolled_difference",
    title: "Students in course A but not course B (EXCEPT)",
    sql: concat!(
        enrolled_names!("1"),
        " EXCEPT ",
        enrolled_names!("2"),
        " ORDER BY name"
    ),
    params: COURSE_PAIR,
    binds_reporting_term: false,
    optional: None,
    order_by: None,
    columns: &["name"],
};

static ENROLLED_INTERSECTION: CatalogEntry = CatalogEntry {
    id: QueryId::EnrolledIntersection,
    name: "enrolled_intersection",
    title: "Students in both course A and course B (INTERSECT)",
    sql: concat!(
        enrolled_names!("1"),
        " INTERSECT ",
        enrolled_names!("2"),
        " ORDER BY name"
    ),
    params: COURSE_PAIR,
    binds_reporting_term: false,
    optional: None,
    order_by: None,
    columns: &["name"],
};

static STUDENT_SCHEDULES: CatalogEntry = CatalogEntry {
    id: QueryId::StudentSchedules,
    name: "student_schedules",
    title: "Schedule entries of one student",
    sql: "SELECT schedule_id, title, \
                 strftime('%Y-%m-%d %H:%M', start_time) AS start_time, \
                 strftime('%Y-%m-%d %H:%M', end_time) AS end_time \
          FROM schedule \
          WHERE student_id = ?1 \
          ORDER BY start_time, schedule_id",
    params: &[param("student_id", ParamKind::Text)],
    binds_reporting_term: false,
    optional: None,
    order_by: None,
    columns: &["schedule_id", "title", "start_time", "end_time"],
};
