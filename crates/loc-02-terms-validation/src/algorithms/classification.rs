//! # Logion Classification Rules
//!
//! Violations are collected across all rules and reported together.

use crate::domain::{
    LogionClassificationParams, TermsAndConditionsElement, TermsError, TransferredRight,
    EXCLUSIVE_RIGHTS,
};
use chrono::{DateTime, NaiveDate};
use shared_types::TermsRecord;
use std::collections::BTreeSet;

const ISO3166_ALPHA2: &str = "\
AD AE AF AG AI AL AM AO AQ AR AS AT AU AW AX AZ BA BB BD BE BF BG BH BI BJ BL BM BN BO BQ BR BS \
BT BV BW BY BZ CA CC CD CF CG CH CI CK CL CM CN CO CR CU CV CW CX CY CZ DE DJ DK DM DO DZ EC EE \
EG EH ER ES ET FI FJ FK FM FO FR GA GB GD GE GF GG GH GI GL GM GN GP GQ GR GS GT GU GW GY HK HM \
HN HR HT HU ID IE IL IM IN IO IQ IR IS IT JE JM JO JP KE KG KH KI KM KN KP KR KW KY KZ LA LB LC \
LI LK LR LS LT LU LV LY MA MC MD ME MF MG MH MK ML MM MN MO MP MQ MR MS MT MU MV MW MX MY MZ NA \
NC NE NF NG NI NL NO NP NR NU NZ OM PA PE PF PG PH PK PL PM PN PR PS PT PW PY QA RE RO RS RU RW \
SA SB SC SD SE SG SH SI SJ SK SL SM SN SO SR SS ST SV SX SY SZ TC TD TF TG TH TJ TK TL TM TN TO \
TR TT TV TW TZ UA UG UM US UY UZ VA VC VE VG VI VN VU WF WS YE YT ZA ZM ZW";

/// True for an assigned ISO-3166 alpha-2 country code.
pub fn is_iso3166_alpha2(code: &str) -> bool {
    code.len() == 2 && ISO3166_ALPHA2.split(' ').any(|c| c == code)
}

fn is_iso8601_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
}

/// Check a logion classification against every rule.
pub fn validate_classification(params: &LogionClassificationParams) -> Result<(), TermsError> {
    let mut violations = Vec::new();
    let mut rights = BTreeSet::new();

    for code in &params.transferred_rights {
        match code.parse::<TransferredRight>() {
            Ok(right) => {
                rights.insert(right);
            }
            Err(unknown) => violations.push(format!("unknown transferred right {}", unknown)),
        }
    }

    for (a, b) in EXCLUSIVE_RIGHTS {
        if rights.contains(&a) && rights.contains(&b) {
            violations.push(format!("{} and {} are mutually exclusive", a, b));
        }
    }

    let has_time = rights.contains(&TransferredRight::Time);
    match (&params.expiration, has_time) {
        (None, true) => violations.push("TIME requires an expiration date".to_string()),
        (Some(_), false) => violations.push("an expiration date requires TIME".to_string()),
        _ => {}
    }
    if let Some(expiration) = &params.expiration {
        if !is_iso8601_date(expiration) {
            violations.push(format!("invalid expiration date {}", expiration));
        }
    }

    let regions = params.regional_limit.as_deref().unwrap_or_default();
    let has_reg = rights.contains(&TransferredRight::Regional);
    if has_reg && regions.is_empty() {
        violations.push("REG requires a regional limit".to_string());
    }
    if !has_reg && !regions.is_empty() {
        violations.push("a regional limit requires REG".to_string());
    }
    for region in regions {
        if !is_iso3166_alpha2(region) {
            violations.push(format!("invalid country code {}", region));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        tracing::debug!("[loc-02] Classification rejected: {:?}", violations);
        Err(TermsError::Violations(violations))
    }
}

/// Validate one element. Only classifications carry rules beyond decoding.
pub fn validate_element(element: &TermsAndConditionsElement) -> Result<(), TermsError> {
    match element {
        TermsAndConditionsElement::LogionClassification { parameters, .. } => {
            validate_classification(parameters)
        }
        _ => Ok(()),
    }
}

/// Validate a list of elements. Violations of every element are reported
/// together, each prefixed with the element position.
pub fn validate_terms(elements: &[TermsAndConditionsElement]) -> Result<(), TermsError> {
    let mut violations = Vec::new();
    for (index, element) in elements.iter().enumerate() {
        match validate_element(element) {
            Ok(()) => {}
            Err(TermsError::Violations(found)) => violations.extend(
                found
                    .into_iter()
                    .map(|violation| format!("element {}: {}", index, violation)),
            ),
            Err(other) => violations.push(format!("element {}: {}", index, other)),
        }
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(TermsError::Violations(violations))
    }
}

/// Decode and validate wire records.
pub fn parse_terms(records: &[TermsRecord]) -> Result<Vec<TermsAndConditionsElement>, TermsError> {
    let elements = records
        .iter()
        .map(TermsAndConditionsElement::from_record)
        .collect::<Result<Vec<_>, _>>()?;
    validate_terms(&elements)?;
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TC_LOGION_CLASSIFICATION;
    use proptest::prelude::*;
    use shared_types::LocId;
    use crate::domain::TransferredRight::*;

    fn params(rights: &[TransferredRight]) -> LogionClassificationParams {
        LogionClassificationParams::with_rights(rights)
    }

    fn violations(params: &LogionClassificationParams) -> Vec<String> {
        match validate_classification(params) {
            Err(TermsError::Violations(v)) => v,
            other => panic!("expected violations, got {:?}", other),
        }
    }

    #[test]
    fn test_personal_rights_exclusive() {
        let v = violations(&params(&[PersonalPrivate, PersonalPublic]));
        assert_eq!(v, vec!["PER-PRIV and PER-PUB are mutually exclusive"]);
    }

    #[test]
    fn test_no_time_constraint_passes() {
        assert!(validate_classification(&params(&[PersonalPrivate, Commercial])).is_ok());
    }

    #[test]
    fn test_time_requires_expiration() {
        let v = violations(&params(&[Time]));
        assert_eq!(v, vec!["TIME requires an expiration date"]);

        let mut with_date = params(&[Time]);
        with_date.expiration = Some("2030-12-31".to_string());
        assert!(validate_classification(&with_date).is_ok());
    }

    #[test]
    fn test_expiration_requires_time() {
        let mut p = params(&[NoTime]);
        p.expiration = Some("2030-12-31".to_string());
        assert_eq!(violations(&p), vec!["an expiration date requires TIME"]);
    }

    #[test]
    fn test_invalid_expiration_date() {
        let mut p = params(&[Time]);
        p.expiration = Some("2030-13-45".to_string());
        assert_eq!(violations(&p), vec!["invalid expiration date 2030-13-45"]);
    }

    #[test]
    fn test_regional_rules() {
        let v = violations(&params(&[Regional]));
        assert_eq!(v, vec!["REG requires a regional limit"]);

        let mut p = params(&[Worldwide]);
        p.regional_limit = Some(vec!["BE".to_string()]);
        assert_eq!(violations(&p), vec!["a regional limit requires REG"]);

        let mut p = params(&[Regional]);
        p.regional_limit = Some(vec!["BE".to_string(), "XX".to_string()]);
        assert_eq!(violations(&p), vec!["invalid country code XX"]);

        let mut p = params(&[Regional]);
        p.regional_limit = Some(vec!["BE".to_string(), "FR".to_string()]);
        assert!(validate_classification(&p).is_ok());
    }

    #[test]
    fn test_violations_accumulate() {
        let mut p = params(&[PersonalPrivate, PersonalPublic, Exclusive, NonExclusive, Time]);
        p.transferred_rights.push("BOGUS".to_string());
        let v = violations(&p);
        assert_eq!(v.len(), 4);
        assert!(v.contains(&"unknown transferred right BOGUS".to_string()));
        assert!(v.contains(&"EX and NOEX are mutually exclusive".to_string()));
    }

    #[test]
    fn test_parse_terms_rejects_invalid_classification() {
        let records = vec![TermsRecord {
            tc_type: TC_LOGION_CLASSIFICATION.to_string(),
            tc_loc: LocId::new_random(),
            details: r#"{"transferredRights":["REG","WW"],"regionalLimit":["BE"]}"#.to_string(),
        }];
        assert!(matches!(
            parse_terms(&records),
            Err(TermsError::Violations(_))
        ));
    }

    #[test]
    fn test_violations_of_every_element_reported() {
        let classification = |rights: &[TransferredRight]| {
            TermsAndConditionsElement::LogionClassification {
                tc_loc: LocId::new_random(),
                parameters: params(rights),
            }
        };
        let elements = vec![
            classification(&[PersonalPrivate, PersonalPublic]),
            classification(&[Commercial]),
            classification(&[Time]),
        ];
        match validate_terms(&elements) {
            Err(TermsError::Violations(v)) => assert_eq!(
                v,
                vec![
                    "element 0: PER-PRIV and PER-PUB are mutually exclusive",
                    "element 2: TIME requires an expiration date",
                ]
            ),
            other => panic!("expected violations, got {:?}", other),
        }
        assert!(validate_terms(&elements[1..2]).is_ok());
    }

    #[test]
    fn test_country_codes() {
        assert!(is_iso3166_alpha2("BE"));
        assert!(is_iso3166_alpha2("ZW"));
        assert!(!is_iso3166_alpha2("be"));
        assert!(!is_iso3166_alpha2("B"));
        assert!(!is_iso3166_alpha2("AD AE"));
    }

    fn any_right() -> impl Strategy<Value = TransferredRight> {
        prop::sample::select(vec![
            PersonalPrivate,
            PersonalPublic,
            Commercial,
            CommercialNoModification,
            CommercialModification,
            Exclusive,
            NonExclusive,
            Worldwide,
            NoTime,
        ])
    }

    proptest! {
        #[test]
        fn prop_both_personal_rights_always_fail(extra in prop::collection::vec(any_right(), 0..6)) {
            let mut rights = extra;
            rights.push(PersonalPrivate);
            rights.push(PersonalPublic);
            prop_assert!(validate_classification(&params(&rights)).is_err());
        }
    }
}
