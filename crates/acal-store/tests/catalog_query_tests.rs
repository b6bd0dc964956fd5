// Catalog queries against the seeded calendar
// Covers binding, ordering, set-operation semantics and the row cap

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use acal_core::logging_facility::test_capture::init_test_capture;
use acal_core::{AcademicTerm, ExErrorKind};
use acal_core_types::schema::{EVENT_END, EVENT_START};
use acal_store::{bind, Arg, CatalogConfig, QueryExecutor, QueryId, ResultSet, StoreHandle};
use common::{enroll_extra_students, seeded_store};
use std::collections::BTreeSet;

fn run(handle: &StoreHandle, id: QueryId, args: &[Arg]) -> ResultSet {
    let bound = bind(id.entry(), args, &CatalogConfig::default()).unwrap();
    QueryExecutor::new(handle).collect(&bound).unwrap()
}

fn names(set: &ResultSet) -> Vec<String> {
    set.column_text("name")
}

fn name_set(handle: &StoreHandle, id: QueryId, a: &str, b: &str) -> BTreeSet<String> {
    names(&run(handle, id, &[Arg::text(a), Arg::text(b)]))
        .into_iter()
        .collect()
}

#[test]
fn test_students_by_department() {
    let handle = seeded_store();
    let set = run(&handle, QueryId::StudentsByDepartment, &[Arg::text("CSE")]);

    assert_eq!(set.columns, vec!["student_id", "name"]);
    assert_eq!(
        set.column_text("student_id"),
        vec!["2022000001", "2022000002", "2022000006"]
    );
}

#[test]
fn test_unknown_department_is_empty_not_error() {
    let handle = seeded_store();
    let set = run(&handle, QueryId::StudentsByDepartment, &[Arg::text("ZZZ")]);
    assert!(set.is_empty());
}

#[test]
fn test_groups_by_purpose_join_leader_name() {
    let handle = seeded_store();
    let set = run(&handle, QueryId::GroupsByPurpose, &[Arg::text("study")]);

    assert_eq!(set.columns, vec!["g_name", "name"]);
    assert_eq!(set.column_text("g_name"), vec!["Algo club", "Math circle"]);
    assert_eq!(names(&set), vec!["Kim Minji", "Park Hana"]);
}

#[test]
fn test_course_stats_ordered_by_count() {
    let handle = seeded_store();
    let set = run(&handle, QueryId::CourseStatsByTerm, &[Arg::Integer(202502)]);

    assert_eq!(
        set.column_text("title"),
        vec!["Intro to Programming", "Calculus", "Data Structures", "Databases"]
    );
    assert_eq!(set.column_text("cnt"), vec!["4", "3", "2", "1"]);
}

#[test]
fn test_co_enrollment_uses_membership_of_second_course() {
    let handle = seeded_store();
    let set = run(
        &handle,
        QueryId::CoEnrollment,
        &[Arg::text("CSE101"), Arg::text("CSE201")],
    );
    assert_eq!(names(&set), vec!["Kim Minji", "Lee Jisoo"]);
}

#[test]
fn test_students_with_schedule_optional_filter() {
    let handle = seeded_store();

    let all = run(&handle, QueryId::StudentsWithSchedule, &[]);
    assert_eq!(all.column_text("student_id"), vec!["2022000001", "2022000003"]);

    let one = run(
        &handle,
        QueryId::StudentsWithSchedule,
        &[Arg::text("2022000003")],
    );
    assert_eq!(names(&one), vec!["Park Hana"]);

    let none = run(
        &handle,
        QueryId::StudentsWithSchedule,
        &[Arg::text("2022000002")],
    );
    assert!(none.is_empty());
}

#[test]
fn test_course_lookup_omits_unknown_codes() {
    let handle = seeded_store();
    let set = run(
        &handle,
        QueryId::CourseLookupByCodes,
        &[Arg::text("CSE101"), Arg::text("NOPE99"), Arg::text("MTH101")],
    );

    assert_eq!(set.columns, vec!["title", "credits"]);
    assert_eq!(set.column_text("title"), vec!["Intro to Programming", "Calculus"]);
    assert_eq!(set.rows[1].integer("credits"), Some(4));
}

#[test]
fn test_popular_courses_threshold_and_term() {
    let handle = seeded_store();
    let set = run(&handle, QueryId::PopularCourses, &[Arg::Integer(3)]);

    assert_eq!(set.column_text("title"), vec!["Intro to Programming", "Calculus"]);
    assert_eq!(set.column_text("student_count"), vec!["4", "3"]);

    // Physics I only runs in 202501
    let config = CatalogConfig::with_term(AcademicTerm::new(202501));
    let bound = bind(QueryId::PopularCourses.entry(), &[Arg::Integer(1)], &config).unwrap();
    let other_term = QueryExecutor::new(&handle).collect(&bound).unwrap();
    assert_eq!(other_term.column_text("title"), vec!["Physics I"]);
}

#[test]
fn test_events_by_month_half_open_range() {
    let handle = seeded_store();
    let set = run(
        &handle,
        QueryId::DepartmentEventsByMonth,
        &[Arg::text("2025-05")],
    );

    assert_eq!(
        set.columns,
        vec!["dept_name", "title", "start_date", "location"]
    );
    let dates = set.column_text("start_date");
    assert_eq!(dates, vec!["2025-05-01", "2025-05-10", "2025-05-31"]);
    assert!(dates
        .iter()
        .all(|d| d.as_str() >= "2025-05-01" && d.as_str() < "2025-06-01"));
    assert_eq!(set.rows[0].text("location"), Some("Science Hall 204"));
}

#[test]
fn test_events_by_month_rejects_malformed_month_before_execution() {
    let err = bind(
        QueryId::DepartmentEventsByMonth.entry(),
        &[Arg::text("2025/05")],
        &CatalogConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Validation);
}

#[test]
fn test_section_ranking_for_reporting_term() {
    let handle = seeded_store();
    let set = run(&handle, QueryId::SectionEnrollmentRanking, &[]);

    let keys: Vec<String> = set
        .rows
        .iter()
        .map(|r| format!("{}-{}", r.text("course_id").unwrap(), r.text("section_id").unwrap()))
        .collect();
    assert_eq!(
        keys,
        vec!["MTH101-1", "CSE101-1", "CSE101-2", "CSE201-1", "CSE301-1"]
    );
    assert_eq!(set.rows[0].integer("student_count"), Some(3));
}

#[test]
fn test_credit_ranking_orders_by_total() {
    let handle = seeded_store();
    let set = run(&handle, QueryId::StudentCreditRanking, &[]);

    assert_eq!(
        names(&set),
        vec!["Kim Minji", "Park Hana", "Kang Seo", "Lee Jisoo", "Choi Yuna"]
    );
    assert_eq!(set.column_text("total_credits"), vec!["10", "7", "6", "6", "4"]);
}

#[test]
fn test_credit_ranking_never_exceeds_twenty_rows() {
    let handle = seeded_store();
    enroll_extra_students(&handle, 30);

    let set = run(&handle, QueryId::StudentCreditRanking, &[]);
    assert_eq!(set.len(), 20);
    assert_eq!(set.rows[0].text("name"), Some("Kim Minji"));
}

#[test]
fn test_union_of_course_with_itself_lists_each_name_once() {
    let handle = seeded_store();
    let set = run(
        &handle,
        QueryId::EnrolledUnion,
        &[Arg::text("CSE101"), Arg::text("CSE101")],
    );
    assert_eq!(
        names(&set),
        vec!["Kang Seo", "Kim Minji", "Lee Jisoo", "Park Hana"]
    );
}

#[test]
fn test_set_operations() {
    let handle = seeded_store();
    let (a, b) = ("CSE101", "MTH101");

    let union = name_set(&handle, QueryId::EnrolledUnion, a, b);
    let diff = name_set(&handle, QueryId::EnrolledDifference, a, b);
    let inter = name_set(&handle, QueryId::EnrolledIntersection, a, b);

    assert_eq!(
        union.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["Choi Yuna", "Kang Seo", "Kim Minji", "Lee Jisoo", "Park Hana"]
    );
    assert_eq!(
        diff.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["Kang Seo", "Lee Jisoo"]
    );
    assert_eq!(
        inter.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["Kim Minji", "Park Hana"]
    );
}

#[test]
fn test_union_partitions_into_differences_and_intersection() {
    let handle = seeded_store();
    let courses = ["CSE101", "CSE201", "CSE301", "MTH101", "PHY101", "NOPE99"];

    for a in courses {
        for b in courses {
            if a == b {
                continue;
            }
            let union = name_set(&handle, QueryId::EnrolledUnion, a, b);
            let a_only = name_set(&handle, QueryId::EnrolledDifference, a, b);
            let both = name_set(&handle, QueryId::EnrolledIntersection, a, b);
            let b_only = name_set(&handle, QueryId::EnrolledDifference, b, a);

            let rebuilt: BTreeSet<String> = a_only
                .iter()
                .chain(both.iter())
                .chain(b_only.iter())
                .cloned()
                .collect();
            assert_eq!(union, rebuilt, "partition failed for {a}/{b}");
            assert!(a_only.is_disjoint(&both));
            assert!(b_only.is_disjoint(&both));
        }
    }
}

#[test]
fn test_student_schedules_ordered_by_start() {
    let handle = seeded_store();
    let set = run(&handle, QueryId::StudentSchedules, &[Arg::text("2022000001")]);

    assert_eq!(
        set.columns,
        vec!["schedule_id", "title", "start_time", "end_time"]
    );
    assert_eq!(set.column_text("title"), vec!["Gym", "Study"]);
    assert_eq!(set.rows[0].text("start_time"), Some("2025-03-01 18:00"));
}

#[test]
fn test_wrong_arity_and_kind_fail_before_execution() {
    let config = CatalogConfig::default();

    let arity = bind(
        QueryId::CourseLookupByCodes.entry(),
        &[Arg::text("CSE101"), Arg::text("MTH101")],
        &config,
    )
    .unwrap_err();
    assert_eq!(arity.kind(), ExErrorKind::Validation);
    assert!(arity.message().contains("takes 3 argument(s), got 2"));

    let kind = bind(
        QueryId::PopularCourses.entry(),
        &[Arg::text("three")],
        &config,
    )
    .unwrap_err();
    assert_eq!(kind.kind(), ExErrorKind::Validation);
}

#[test]
fn test_every_entry_declares_its_columns() {
    let handle = seeded_store();
    for id in QueryId::ALL {
        let entry = id.entry();
        let args: Vec<Arg> = entry
            .params
            .iter()
            .map(|p| match p.kind {
                acal_store::ParamKind::Integer => Arg::Integer(1),
                acal_store::ParamKind::YearMonth => Arg::text("2025-05"),
                acal_store::ParamKind::Text => Arg::text("CSE101"),
            })
            .collect();
        let set = run(&handle, id, &args);
        assert_eq!(set.columns, entry.columns, "{}", entry.name);
    }
}

#[test]
fn test_collect_logs_start_and_end() {
    let capture = init_test_capture();
    let handle = seeded_store();

    run(
        &handle,
        QueryId::CourseLookupByCodes,
        &[Arg::text("CSE101"), Arg::text("CSE201"), Arg::text("CSE301")],
    );

    let op = "course_lookup_by_codes";
    assert!(!capture.lifecycle(op, EVENT_START).is_empty());
    assert!(capture
        .lifecycle(op, EVENT_END)
        .iter()
        .any(|e| e.field("row_count") == Some("3")));
}
