use uuid::Uuid;

/// Namespace for rule ids; fixed so the same block always exports the same ids.
const RULE_ID_NAMESPACE: Uuid = Uuid::from_u128(0x5c0e_7d1a_3b4f_4e8a_9f62_d1c3_0a7b_e215);

/// Deterministic `{XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX}` id linking a base rule to its
/// x14 counterpart.
pub fn rule_id(sqref: &str, priority: u32) -> String {
    let uuid = Uuid::new_v5(&RULE_ID_NAMESPACE, format!("{sqref}#{priority}").as_bytes());
    format!("{{{}}}", uuid.hyphenated().to_string().to_ascii_uppercase())
}

/// Canonical form used to match ids written by other producers (braces and case vary).
pub(super) fn normalize_rule_id(id: &str) -> String {
    id.trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .to_ascii_uppercase()
}
