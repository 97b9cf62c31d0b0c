//! Tests for body parsing, query parsing, and the shared field rules.

use super::*;
use crate::domain::ErrorCode;
use rstest::rstest;
use serde_json::json;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
struct SampleBody {
    #[validate(required(message = "This field is required"), length(min = 1, message = "Invalid length"))]
    #[serde(default, deserialize_with = "trimmed")]
    name: Option<String>,
    #[validate(custom(function = "validate_email"))]
    email: Option<String>,
}

fn details(err: &Error) -> &Value {
    err.details().expect("details present")
}

#[rstest]
#[case(b"".as_slice())]
#[case(b"  \n".as_slice())]
#[case(b"{}".as_slice())]
fn empty_bodies_are_rejected(#[case] body: &[u8]) {
    let err = parse_body::<SampleBody>(body).expect_err("empty body");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Request body cannot be empty");
}

#[rstest]
#[case(b"{not json".as_slice())]
#[case(br#"{"name": 42}"#.as_slice())]
#[case(b"[1, 2]".as_slice())]
fn malformed_bodies_are_rejected(#[case] body: &[u8]) {
    let err = parse_body::<SampleBody>(body).expect_err("malformed body");
    assert_eq!(err.message(), "Invalid request body");
    assert_eq!(details(&err)["body"], "Request body is invalid or malformed");
}

#[rstest]
fn rule_failures_are_reported_per_field() {
    let err = parse_body::<SampleBody>(br#"{"email": "nope"}"#).expect_err("invalid");
    assert_eq!(err.message(), "Validation failed");
    assert_eq!(
        details(&err),
        &json!({ "name": "This field is required", "email": "Invalid email format" })
    );
}

#[rstest]
fn valid_bodies_pass_through() {
    let sample = parse_body::<SampleBody>(br#"{"name": " Paracetamol ", "email": "a@b.co"}"#)
        .expect("valid body");
    assert_eq!(sample.name.as_deref(), Some("Paracetamol"));
}

#[rstest]
fn rules_run_against_trimmed_text() {
    let err = parse_body::<SampleBody>(br#"{"name": "   "}"#).expect_err("blank name");
    assert_eq!(details(&err), &json!({ "name": "Invalid length" }));
}

#[rstest]
#[case(None, None, 1, 10)]
#[case(Some("2"), Some("5"), 2, 5)]
#[case(Some(""), Some(" "), 1, 10)]
#[case(Some("3"), Some("100"), 3, 100)]
fn page_query_applies_defaults(
    #[case] page: Option<&str>,
    #[case] page_size: Option<&str>,
    #[case] expected_page: u32,
    #[case] expected_size: u32,
) {
    let query = PageQuery {
        page: page.map(ToOwned::to_owned),
        page_size: page_size.map(ToOwned::to_owned),
    };
    let request = query.into_page_request().expect("valid query");
    assert_eq!(request.page(), expected_page);
    assert_eq!(request.page_size(), expected_size);
}

#[rstest]
#[case(Some("0"), None, "page")]
#[case(Some("-1"), None, "page")]
#[case(Some("two"), None, "page")]
#[case(None, Some("0"), "page_size")]
#[case(None, Some("101"), "page_size")]
#[case(None, Some("ten"), "page_size")]
fn page_query_rejects_out_of_range_values(
    #[case] page: Option<&str>,
    #[case] page_size: Option<&str>,
    #[case] field: &str,
) {
    let query = PageQuery {
        page: page.map(ToOwned::to_owned),
        page_size: page_size.map(ToOwned::to_owned),
    };
    let err = query.into_page_request().expect_err("out of range");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert!(details(&err).get(field).is_some(), "missing {field} entry");
}

#[rstest]
#[case("42", Some(42))]
#[case(" 7 ", Some(7))]
#[case("0", None)]
#[case("-3", None)]
#[case("abc", None)]
fn parses_positive_ids(#[case] raw: &str, #[case] expected: Option<i64>) {
    let parsed = parse_id(raw, FieldName::new("id")).ok();
    assert_eq!(parsed, expected);
}

#[rstest]
#[case("Str0ng!Pass", true)]
#[case("Sh0rt!", false)]
#[case("nouppercase1!", false)]
#[case("NOLOWERCASE1!", false)]
#[case("NoDigits!!", false)]
#[case("NoSymbols11", false)]
fn password_complexity(#[case] password: &str, #[case] accepted: bool) {
    assert_eq!(validate_password(password).is_ok(), accepted);
}

#[rstest]
#[case("alice@example.com", true)]
#[case("first.last+tag@pharmacy.co.uk", true)]
#[case("alice@example", false)]
#[case("@example.com", false)]
#[case("alice example@x.com", false)]
fn email_shape(#[case] email: &str, #[case] accepted: bool) {
    assert_eq!(validate_email(email).is_ok(), accepted);
}

#[rstest]
#[case(None, Some(Role::Cashier))]
#[case(Some(""), Some(Role::Cashier))]
#[case(Some("admin"), Some(Role::Admin))]
#[case(Some("pharmacist"), Some(Role::Pharmacist))]
#[case(Some("owner"), None)]
fn role_defaults_to_cashier(#[case] raw: Option<&str>, #[case] expected: Option<Role>) {
    assert_eq!(parse_role(raw), expected);
}

#[rstest]
#[case("2027-03-31", Some((2027, 3, 31)))]
#[case("2027-03-31T00:00:00Z", Some((2027, 3, 31)))]
#[case("31/03/2027", None)]
fn expiration_dates_accept_both_forms(
    #[case] raw: &str,
    #[case] expected: Option<(i32, u32, u32)>,
) {
    let expected = expected.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
    assert_eq!(parse_date(raw), expected);
}

#[rstest]
#[case(Some("  Acme  "), Some("Acme"))]
#[case(Some("   "), None)]
#[case(None, None)]
fn blank_optional_strings_become_absent(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
    assert_eq!(non_blank(raw.map(ToOwned::to_owned)).as_deref(), expected);
}

#[rstest]
fn optional_email_accepts_blank() {
    assert!(validate_optional_email("").is_ok());
    assert!(validate_optional_email("orders@acme.example").is_ok());
    assert!(validate_optional_email("orders").is_err());
}

#[rstest]
fn required_reports_the_field() {
    let err = required::<i64>(None, FieldName::new("supplier_id")).expect_err("missing");
    assert_eq!(details(&err)["supplier_id"], "This field is required");
}

#[rstest]
fn negative_decimals_are_rejected() {
    assert!(validate_non_negative_decimal(&Decimal::new(-1, 2)).is_err());
    assert!(validate_non_negative_decimal(&Decimal::ZERO).is_ok());
    assert!(validate_non_negative_decimal(&Decimal::new(1999, 2)).is_ok());
}
