use super::*;
use crate::format::MysqlFormatter;
use crate::record;

fn mapping() -> Mapping {
    Mapping::new()
        .field("user_id", FieldType::Number)
        .field("phone", FieldType::Number)
        .field("name", FieldType::String)
        .field("created", FieldType::Datetime)
        .field("location", FieldType::Point)
}

// ==================== SimpleWhere ====================

#[test]
fn simple_where_renders_and_chain() {
    let filter = record! { "user_id" => 123, "name" => "Harry" };
    let w = SimpleWhere::compile(&filter, &mapping()).unwrap();
    assert_eq!(w.template(), "WHERE ? AND ?");
    assert_eq!(w.render(&MysqlFormatter), "WHERE `user_id` = 123 AND `name` = 'Harry'");
}

#[test]
fn simple_where_empty_has_no_clause() {
    let w = SimpleWhere::compile(&Record::new(), &mapping()).unwrap();
    assert!(w.is_empty());
    assert_eq!(w.render(&MysqlFormatter), "");
}

#[test]
fn simple_where_rejects_null() {
    let filter = record! { "user_id" => 123, "phone" => Value::Null };
    let err = SimpleWhere::compile(&filter, &mapping()).unwrap_err();
    assert_eq!(err.to_string(), "Invalid value phone : null in where object");
}

#[test]
fn simple_where_rejects_unmapped_and_mismatched() {
    let err = SimpleWhere::compile(&record! { "nope" => 1 }, &mapping()).unwrap_err();
    assert!(err.is_invalid_where());

    let err = SimpleWhere::compile(&record! { "user_id" => "123" }, &mapping()).unwrap_err();
    assert_eq!(err.to_string(), "Invalid value user_id : 123 in where object");

    let point = record! { "location" => record! { "x" => 1, "y" => 2 } };
    assert!(SimpleWhere::compile(&point, &mapping()).is_err());
}

#[test]
fn simple_where_formats_strings() {
    let filter = record! { "name" => "a\r\nb" };
    let w = SimpleWhere::compile(&filter, &mapping()).unwrap();
    assert_eq!(w.params(), &[("name".to_string(), Value::from("a\nb"))]);
}

// ==================== Filter ====================

#[test]
fn filter_requires_a_group() {
    let err = Filter::compile(&Record::new(), &mapping()).unwrap_err();
    assert_eq!(err, BuildError::MissingFilterGroup);

    let empty_groups = record! { "and" => Record::new(), "or" => "x" };
    assert_eq!(
        Filter::compile(&empty_groups, &mapping()).unwrap_err(),
        BuildError::MissingFilterGroup
    );
}

#[test]
fn filter_and_group_with_operators() {
    let filter = record! {
        "and" => record! {
            "user_id" => record! { ">=" => 10, "<" => 20 },
            "name" => "Harry",
        },
    };
    let f = Filter::compile(&filter, &mapping()).unwrap();
    assert_eq!(
        f.render(&MysqlFormatter),
        "WHERE `user_id` >= 10 AND `user_id` < 20 AND `name` = 'Harry'"
    );
}

#[test]
fn filter_and_or_composite_is_unparenthesized() {
    let filter = record! {
        "and" => record! { "user_id" => 1, "phone" => 2 },
        "or" => record! { "name" => "a", "created" => "2020-01-01" },
    };
    let f = Filter::compile(&filter, &mapping()).unwrap();
    assert_eq!(
        f.render(&MysqlFormatter),
        "WHERE `user_id` = 1 AND `phone` = 2 OR `name` = 'a' OR `created` = '2020-01-01'"
    );
}

#[test]
fn filter_or_only() {
    let filter = record! { "or" => record! { "user_id" => 1, "phone" => 2 } };
    let f = Filter::compile(&filter, &mapping()).unwrap();
    assert!(f.and_clauses().is_empty());
    assert_eq!(f.render(&MysqlFormatter), "WHERE `user_id` = 1 OR `phone` = 2");
}

#[test]
fn filter_in_drops_mismatched_elements() {
    let filter = record! {
        "and" => record! {
            "user_id" => record! { "in" => vec![Value::Int(1), Value::from("x"), Value::Int(3)] },
            "phone" => record! { "not in" => vec![5] },
        },
    };
    let f = Filter::compile(&filter, &mapping()).unwrap();
    assert_eq!(
        f.render(&MysqlFormatter),
        "WHERE `user_id` IN(1,3) AND `phone` NOT IN(5)"
    );
}

#[test]
fn filter_empty_in_list() {
    let filter = record! {
        "and" => record! {
            "user_id" => record! { "in" => vec![Value::from("x")] },
            "phone" => record! { "not in" => Vec::<Value>::new() },
        },
    };
    let f = Filter::compile(&filter, &mapping()).unwrap();
    assert_eq!(f.render(&MysqlFormatter), "WHERE 1=0 AND 1=1");
}

#[test]
fn filter_in_requires_list() {
    let filter = record! { "and" => record! { "user_id" => record! { "in" => 5 } } };
    let err = Filter::compile(&filter, &mapping()).unwrap_err();
    assert_eq!(err.to_string(), "Invalid value user_id : 5 in where object");
}

#[test]
fn filter_operator_mismatch_is_an_error() {
    let filter = record! { "or" => record! { "user_id" => record! { ">" => "ten" } } };
    assert!(Filter::compile(&filter, &mapping()).unwrap_err().is_invalid_where());

    let filter = record! { "and" => record! { "user_id" => true } };
    assert!(Filter::compile(&filter, &mapping()).unwrap_err().is_invalid_where());
}

#[test]
fn filter_skips_unmapped_null_and_unknown_operators() {
    let filter = record! {
        "and" => record! {
            "ghost" => 1,
            "phone" => Value::Null,
            "user_id" => record! { "like" => "1%" },
        },
    };
    let f = Filter::compile(&filter, &mapping()).unwrap();
    assert!(f.is_empty());
    assert_eq!(f.render(&MysqlFormatter), "");
}

#[test]
fn clause_field_name() {
    let c = Clause::Compare {
        field: "user_id".into(),
        op: CompareOp::Lte,
        value: Value::Int(1),
    };
    assert_eq!(c.field(), "user_id");
    assert_eq!(c.render(&MysqlFormatter), "`user_id` <= 1");
}
