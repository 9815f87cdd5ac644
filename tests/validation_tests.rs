//! End-to-end validation tests
//!
//! Each test parses a schema, validates one or more documents against it
//! and compares the full, ordered error list.

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use xsd_validator::{Error, Limits, Validator};

const XS: &str = r#"xmlns:xs="http://www.w3.org/2001/XMLSchema""#;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(name: &str) -> String {
    fs::read_to_string(fixtures_dir().join(name)).unwrap()
}

fn validator(body: &str) -> Validator {
    let xsd = format!(r#"<?xml version="1.0"?><xs:schema {}>{}</xs:schema>"#, XS, body);
    Validator::from_string(&xsd).unwrap()
}

fn errors(validator: &Validator, xml: &str) -> Vec<String> {
    validator.validate_string(xml).unwrap().errors
}

/// Schema with a single root `v` of the given built-in type
fn builtin_validator(type_name: &str) -> Validator {
    validator(&format!(r#"<xs:element name="v" type="xs:{}"/>"#, type_name))
}

fn check_builtin(type_name: &str, value: &str) -> Vec<String> {
    errors(&builtin_validator(type_name), &format!("<v>{}</v>", value))
}

#[test]
fn test_builtin_canonical_values() {
    let cases = [
        ("string", "anything at all"),
        ("integer", "-42"),
        ("int", "2147483647"),
        ("long", "9223372036854775807"),
        ("positiveInteger", "1"),
        ("decimal", "3.14"),
        ("float", "1e10"),
        ("double", "-0.5"),
        ("double", "INF"),
        ("boolean", "true"),
        ("boolean", "0"),
        ("date", "2024-01-15"),
        ("time", "13:20:00"),
        ("time", "13:20:00.250"),
        ("dateTime", "2024-01-15T13:20:00"),
        ("duration", "P1Y2M3DT4H5M6.5S"),
        ("gYear", "2024"),
        ("gYearMonth", "2024-01"),
        ("hexBinary", "0FB7"),
        ("base64Binary", "SGVsbG8="),
        ("anyURI", "https://example.com/a?b=c"),
    ];

    for (type_name, value) in cases {
        assert_eq!(
            check_builtin(type_name, value),
            Vec::<String>::new(),
            "xs:{} should accept {:?}",
            type_name,
            value
        );
    }
}

#[test]
fn test_builtin_malformed_values() {
    let cases = [
        ("integer", "4.2", "invalid integer value: 4.2"),
        ("int", "2147483648", "invalid int value: 2147483648"),
        ("long", "9223372036854775808", "invalid long value: 9223372036854775808"),
        ("positiveInteger", "abc", "invalid positive integer value: abc"),
        ("positiveInteger", "0", "value must be positive, got 0"),
        ("positiveInteger", "-3", "value must be positive, got -3"),
        ("decimal", "3.14.15", "invalid decimal value: 3.14.15"),
        ("float", "1e39", "invalid float value: 1e39"),
        ("double", "1e400", "invalid double value: 1e400"),
        ("boolean", "yes", "invalid boolean value: yes"),
        ("date", "2024-13-40", "invalid date value: 2024-13-40"),
        ("date", "2024-02-30", "invalid date value: 2024-02-30"),
        ("time", "25:00:00", "invalid time value: 25:00:00"),
        ("dateTime", "2024-01-15T13:20:00Z", "invalid dateTime value: 2024-01-15T13:20:00Z"),
        ("duration", "1Y", "invalid duration value: 1Y"),
        ("gYear", "24", "invalid gYear value: 24"),
        ("gYearMonth", "2024-1", "invalid gYearMonth value: 2024-1"),
        ("hexBinary", "0FG7", "invalid hexBinary value: 0FG7"),
        ("base64Binary", "SGVsbG8===", "invalid base64Binary value: SGVsbG8==="),
        ("anyURI", "example.com", "invalid anyURI value: example.com"),
    ];

    for (type_name, value, message) in cases {
        assert_eq!(
            check_builtin(type_name, value),
            vec![format!("invalid content in element 'v': {}", message)],
            "xs:{} should reject {:?}",
            type_name,
            value
        );
    }
}

#[test]
fn test_empty_text_is_not_type_checked() {
    assert!(check_builtin("date", "").is_empty());
    assert!(check_builtin("integer", "   ").is_empty());
}

#[test]
fn test_missing_required_attribute() {
    let validator = validator(
        r#"<xs:element name="employee">
            <xs:complexType>
                <xs:attribute name="id" type="xs:positiveInteger" use="required"/>
            </xs:complexType>
        </xs:element>"#,
    );

    assert_eq!(
        errors(&validator, "<employee></employee>"),
        vec!["missing required attribute 'id'"]
    );
    assert_eq!(
        errors(&validator, r#"<employee id="7" dept="ops"/>"#),
        vec!["unexpected attribute 'dept'"]
    );
    assert_eq!(
        errors(&validator, r#"<employee id="0"/>"#),
        vec!["attribute 'id': value must be positive, got 0"]
    );
}

#[test]
fn test_one_error_per_attribute_problem() {
    let validator = validator(
        r#"<xs:element name="employee">
            <xs:complexType>
                <xs:attribute name="id" type="xs:int" use="required"/>
                <xs:attribute name="role" type="xs:string"/>
            </xs:complexType>
        </xs:element>"#,
    );

    assert_eq!(
        errors(&validator, r#"<employee role="dev" badge="x"/>"#),
        vec![
            "unexpected attribute 'badge'",
            "missing required attribute 'id'",
        ]
    );
}

#[test]
fn test_sequence_children() {
    let validator = validator(
        r#"<xs:element name="person">
            <xs:complexType>
                <xs:sequence>
                    <xs:element name="name" type="xs:string"/>
                    <xs:element name="age" type="xs:integer"/>
                </xs:sequence>
            </xs:complexType>
        </xs:element>"#,
    );

    assert!(errors(&validator, "<person><name>John</name><age>30</age></person>").is_empty());
    // Document order is not enforced
    assert!(errors(&validator, "<person><age>30</age><name>John</name></person>").is_empty());
    assert_eq!(
        errors(
            &validator,
            "<person><name>John</name><age>thirty</age><email>j@x</email></person>"
        ),
        vec![
            "invalid content in element 'age': invalid integer value: thirty",
            "unexpected element 'email'",
        ]
    );
}

#[test]
fn test_optional_and_unbounded_occurrences() {
    let validator = validator(
        r#"<xs:element name="list">
            <xs:complexType>
                <xs:sequence>
                    <xs:element name="note" type="xs:string" minOccurs="0"/>
                    <xs:element name="entry" type="xs:string" maxOccurs="unbounded"/>
                    <xs:element name="footer" type="xs:string" minOccurs="0" maxOccurs="2"/>
                </xs:sequence>
            </xs:complexType>
        </xs:element>"#,
    );

    let many: String = (0..50).map(|i| format!("<entry>{}</entry>", i)).collect();
    assert!(errors(&validator, &format!("<list>{}</list>", many)).is_empty());

    assert_eq!(
        errors(
            &validator,
            "<list><note/><note/><footer/><footer/><footer/></list>"
        ),
        vec![
            "element 'note' occurs 2 times, maximum allowed is 1",
            "element 'entry' occurs 0 times, minimum required is 1",
            "element 'footer' occurs 3 times, maximum allowed is 2",
        ]
    );
}

#[test]
fn test_enumeration_is_exact_and_case_sensitive() {
    let validator = validator(
        r#"<xs:element name="priority">
            <xs:simpleType>
                <xs:restriction base="xs:string">
                    <xs:enumeration value="high"/>
                    <xs:enumeration value="medium"/>
                    <xs:enumeration value="low"/>
                </xs:restriction>
            </xs:simpleType>
        </xs:element>"#,
    );
    let rejected = vec!["invalid content in element 'priority': value must be one of the enumerated values"];

    assert!(errors(&validator, "<priority>medium</priority>").is_empty());
    assert_eq!(errors(&validator, "<priority>urgent</priority>"), rejected);
    assert_eq!(errors(&validator, "<priority>High</priority>"), rejected);
    assert_eq!(errors(&validator, "<priority>lowest</priority>"), rejected);
}

#[test]
fn test_pattern_restriction() {
    let validator = validator(
        r#"<xs:element name="code">
            <xs:simpleType>
                <xs:restriction base="xs:string">
                    <xs:pattern value="[A-Z]{2}-[0-9]{3}"/>
                </xs:restriction>
            </xs:simpleType>
        </xs:element>"#,
    );

    assert!(errors(&validator, "<code>AB-123</code>").is_empty());
    assert_eq!(
        errors(&validator, "<code>123-AB</code>"),
        vec!["invalid content in element 'code': value does not match pattern: [A-Z]{2}-[0-9]{3}"]
    );
    // Patterns match the whole value
    assert_eq!(errors(&validator, "<code>XAB-1234</code>").len(), 1);
}

#[test]
fn test_xsd_character_classes() {
    let validator = validator(
        r#"<xs:element name="id">
            <xs:simpleType>
                <xs:restriction base="xs:string">
                    <xs:pattern value="\i\c*-\d+"/>
                </xs:restriction>
            </xs:simpleType>
        </xs:element>"#,
    );

    assert!(errors(&validator, "<id>item_42-7</id>").is_empty());
    assert_eq!(
        errors(&validator, "<id>4item-7</id>"),
        vec![r"invalid content in element 'id': value does not match pattern: \i\c*-\d+"]
    );
}

#[test]
fn test_escaped_backslash_in_pattern() {
    let validator = validator(
        r#"<xs:element name="p">
            <xs:simpleType>
                <xs:restriction base="xs:string">
                    <xs:pattern value="a\\d"/>
                </xs:restriction>
            </xs:simpleType>
        </xs:element>"#,
    );

    assert!(errors(&validator, r"<p>a\d</p>").is_empty());
    assert_eq!(
        errors(&validator, "<p>a7</p>"),
        vec![r"invalid content in element 'p': value does not match pattern: a\\d"]
    );
}

#[test]
fn test_schema_with_doctype() {
    let xsd = format!(
        r#"<?xml version="1.0"?>
        <!DOCTYPE xs:schema [ <!ENTITY ns "urn:x"> ]>
        <xs:schema {} targetNamespace="&ns;">
            <xs:element name="v" type="xs:int"/>
        </xs:schema>"#,
        XS
    );
    let validator = Validator::from_string(&xsd).unwrap();

    assert!(errors(&validator, r#"<v xmlns="urn:x">42</v>"#).is_empty());
    assert_eq!(
        errors(&validator, r#"<v xmlns="urn:x">big</v>"#),
        vec!["invalid content in element 'v': invalid int value: big"]
    );
}

#[test]
fn test_invalid_pattern_is_reported() {
    let validator = validator(
        r#"<xs:element name="code">
            <xs:simpleType>
                <xs:restriction base="xs:string">
                    <xs:pattern value="[A-Z"/>
                </xs:restriction>
            </xs:simpleType>
        </xs:element>"#,
    );

    assert_eq!(
        errors(&validator, "<code>A</code>"),
        vec!["invalid content in element 'code': invalid pattern: [A-Z"]
    );
}

#[test]
fn test_inclusive_bounds() {
    let validator = validator(
        r#"<xs:element name="price">
            <xs:simpleType>
                <xs:restriction base="xs:decimal">
                    <xs:minInclusive value="1"/>
                    <xs:maxInclusive value="100"/>
                </xs:restriction>
            </xs:simpleType>
        </xs:element>"#,
    );

    assert!(errors(&validator, "<price>1</price>").is_empty());
    assert!(errors(&validator, "<price>100</price>").is_empty());
    assert_eq!(
        errors(&validator, "<price>0</price>"),
        vec!["invalid content in element 'price': value must be >= 1, got 0"]
    );
    assert_eq!(
        errors(&validator, "<price>100.5</price>"),
        vec!["invalid content in element 'price': value must be <= 100, got 100.5"]
    );
}

#[test]
fn test_named_simple_type_chain() {
    let validator = validator(
        r#"<xs:simpleType name="Percent">
            <xs:restriction base="xs:integer">
                <xs:minInclusive value="0"/>
                <xs:maxInclusive value="100"/>
            </xs:restriction>
        </xs:simpleType>
        <xs:simpleType name="PassingGrade">
            <xs:restriction base="Percent">
                <xs:minExclusive value="49"/>
            </xs:restriction>
        </xs:simpleType>
        <xs:element name="grade" type="PassingGrade"/>"#,
    );

    assert!(errors(&validator, "<grade>75</grade>").is_empty());
    assert_eq!(
        errors(&validator, "<grade>49</grade>"),
        vec!["invalid content in element 'grade': value must be > 49, got 49"]
    );
    assert_eq!(
        errors(&validator, "<grade>101</grade>"),
        vec!["invalid content in element 'grade': value must be <= 100, got 101"]
    );
    assert_eq!(
        errors(&validator, "<grade>high</grade>"),
        vec!["invalid content in element 'grade': invalid integer value: high"]
    );
}

#[test]
fn test_unknown_type_is_unsupported() {
    let validator = validator(r#"<xs:element name="v" type="xs:NMTOKEN"/>"#);
    assert_eq!(
        errors(&validator, "<v>abc</v>"),
        vec!["invalid content in element 'v': unsupported type: xs:NMTOKEN"]
    );
}

#[test]
fn test_choice_group() {
    let validator = validator(
        r#"<xs:element name="payment">
            <xs:complexType>
                <xs:choice>
                    <xs:element name="card" type="xs:string"/>
                    <xs:element name="invoice" type="xs:string"/>
                </xs:choice>
            </xs:complexType>
        </xs:element>"#,
    );

    assert!(errors(&validator, "<payment><card>visa</card></payment>").is_empty());
    assert_eq!(
        errors(&validator, "<payment/>"),
        vec!["choice group occurs 0 times, minimum required is 1"]
    );
    assert_eq!(
        errors(&validator, "<payment><card/><invoice/></payment>"),
        vec!["choice group occurs 2 times, maximum allowed is 1"]
    );
    assert_eq!(
        errors(&validator, "<payment><cash/></payment>"),
        vec![
            "element 'cash' is not a valid choice",
            "choice group occurs 0 times, minimum required is 1",
        ]
    );
}

#[test]
fn test_book_missing_author() {
    let validator = Validator::from_string(&fixture("book.xsd")).unwrap();

    let result = validator.validate_string(&fixture("book.xml")).unwrap();
    assert!(result.valid);
    assert!(result.errors.is_empty());

    let result = validator
        .validate_string(&fixture("book_missing_author.xml"))
        .unwrap();
    assert!(!result.valid);
    assert_eq!(
        result.errors,
        vec!["element 'author' occurs 0 times, minimum required is 1"]
    );
    assert_eq!(result.subject, "book");
}

#[test]
fn test_purchase_order() {
    let validator = Validator::from_string(&fixture("purchase_order.xsd")).unwrap();

    let result = validator
        .validate_string(&fixture("purchase_order.xml"))
        .unwrap();
    assert_eq!(result.errors, Vec::<String>::new());
    assert!(result.valid);

    let result = validator
        .validate_string(&fixture("purchase_order_invalid.xml"))
        .unwrap();
    assert!(!result.valid);
    assert_eq!(
        result.errors,
        vec![
            "attribute 'orderDate': invalid date value: 20-10-1999",
            "unexpected attribute 'rush'",
            "invalid content in element 'zip': length must be exactly 5, got 4",
            "element 'pickup' is not a valid choice",
            "choice group occurs 0 times, minimum required is 1",
            r"attribute 'partNum': value does not match pattern: \d{3}-[A-Z]{2}",
            "invalid content in element 'quantity': value must be < 100, got 100",
            "invalid content in element 'price': value must be > 0, got 0",
        ]
    );
}

#[test]
fn test_reader_input() {
    let xsd = fs::File::open(fixtures_dir().join("book.xsd")).unwrap();
    let validator = Validator::from_reader(xsd).unwrap();

    let xml = fs::File::open(fixtures_dir().join("book.xml")).unwrap();
    assert!(validator.validate_reader(xml).unwrap().valid);
}

#[test]
fn test_setup_errors() {
    assert!(matches!(
        Validator::from_string("<xs:schema"),
        Err(Error::SchemaParse(_))
    ));

    let validator = Validator::from_string(&fixture("book.xsd")).unwrap();
    assert!(matches!(
        validator.validate_string("<book><title>"),
        Err(Error::XmlParse(_))
    ));

    let err = validator.validate_string("<magazine/>").unwrap_err();
    assert_eq!(err.to_string(), "root element '{}magazine' not defined in schema");
}

#[test]
fn test_limits_reject_oversized_input() {
    let limits = Limits {
        max_xml_size: 32,
        ..Limits::default()
    };
    let validator = Validator::from_string(&fixture("book.xsd"))
        .unwrap()
        .with_limits(limits);

    let err = validator
        .validate_string(&fixture("book.xml"))
        .unwrap_err();
    assert!(matches!(err, Error::LimitExceeded(_)));
}

#[test]
fn test_validation_is_idempotent() {
    let validator = Validator::from_string(&fixture("purchase_order.xsd")).unwrap();
    let xml = fixture("purchase_order_invalid.xml");

    let first = validator.validate_string(&xml).unwrap();
    let second = validator.validate_string(&xml).unwrap();
    assert_eq!(first, second);
}

fn priority_validator() -> Validator {
    validator(
        r#"<xs:element name="priority">
            <xs:simpleType>
                <xs:restriction base="xs:string">
                    <xs:enumeration value="high"/>
                    <xs:enumeration value="medium"/>
                    <xs:enumeration value="low"/>
                </xs:restriction>
            </xs:simpleType>
        </xs:element>"#,
    )
}

fn tags_validator() -> Validator {
    validator(
        r#"<xs:element name="tags">
            <xs:complexType>
                <xs:sequence>
                    <xs:element name="tag" type="xs:string" minOccurs="1" maxOccurs="3"/>
                </xs:sequence>
            </xs:complexType>
        </xs:element>"#,
    )
}

fn short_validator() -> Validator {
    validator(
        r#"<xs:element name="short">
            <xs:simpleType>
                <xs:restriction base="xs:string">
                    <xs:minLength value="2"/>
                    <xs:maxLength value="5"/>
                </xs:restriction>
            </xs:simpleType>
        </xs:element>"#,
    )
}

proptest! {
    #[test]
    fn prop_enumeration_membership(value in "[a-z]{1,8}") {
        let result = priority_validator()
            .validate_string(&format!("<priority>{}</priority>", value))
            .unwrap();
        let allowed = ["high", "medium", "low"].contains(&value.as_str());
        prop_assert_eq!(result.valid, allowed);
    }

    #[test]
    fn prop_occurrence_bounds(count in 0usize..7) {
        let tags: String = (0..count).map(|_| "<tag>x</tag>").collect();
        let result = tags_validator()
            .validate_string(&format!("<tags>{}</tags>", tags))
            .unwrap();

        let expected: Vec<String> = if count < 1 {
            vec![format!("element 'tag' occurs {} times, minimum required is 1", count)]
        } else if count > 3 {
            vec![format!("element 'tag' occurs {} times, maximum allowed is 3", count)]
        } else {
            vec![]
        };
        prop_assert_eq!(result.errors, expected);
    }

    #[test]
    fn prop_length_bounds(value in "[a-z]{1,9}") {
        let result = short_validator()
            .validate_string(&format!("<short>{}</short>", value))
            .unwrap();

        let len = value.chars().count();
        let expected: Vec<String> = if len < 2 {
            vec![format!("invalid content in element 'short': length must be at least 2, got {}", len)]
        } else if len > 5 {
            vec![format!("invalid content in element 'short': length must be at most 5, got {}", len)]
        } else {
            vec![]
        };
        prop_assert_eq!(result.errors, expected);
    }
}
