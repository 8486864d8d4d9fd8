use std::fmt;

/// A sequence of human-readable observation numbers sharing one prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeFamily {
    Recommended,
    NotRecommended,
    ManagementDecision,
    Recheck,
}

impl CodeFamily {
    pub const ALL: [CodeFamily; 4] = [
        CodeFamily::Recommended,
        CodeFamily::NotRecommended,
        CodeFamily::ManagementDecision,
        CodeFamily::Recheck,
    ];

    pub const fn prefix(self) -> &'static str {
        match self {
            CodeFamily::Recommended => "R",
            CodeFamily::NotRecommended => "NR",
            CodeFamily::ManagementDecision => "SCN",
            CodeFamily::Recheck => "RC",
        }
    }

    /// Zero-padded digit count. Register codes use five digits, recheck codes four.
    pub const fn width(self) -> usize {
        match self {
            CodeFamily::Recheck => 4,
            _ => 5,
        }
    }

    /// Key for the transaction-scoped advisory lock serializing allocations
    /// within this family.
    pub const fn lock_key(self) -> i64 {
        // "TYRE" (0x54595245) shifted left 16 bits; the low 16 bits hold the family.
        const BASE: i64 = 0x5459_5245_0000;
        match self {
            CodeFamily::Recommended => BASE + 1,
            CodeFamily::NotRecommended => BASE + 2,
            CodeFamily::ManagementDecision => BASE + 3,
            CodeFamily::Recheck => BASE + 4,
        }
    }

    /// Numeric suffix of `code` when it belongs to this family.
    pub fn sequence_of(self, code: &str) -> Option<u64> {
        let digits = code.strip_prefix(self.prefix())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    pub fn owns(self, code: &str) -> bool {
        self.sequence_of(code).is_some()
    }

    pub fn format(self, sequence: u64) -> String {
        format!(
            "{}{:0width$}",
            self.prefix(),
            sequence,
            width = self.width()
        )
    }

    /// Family whose prefix `code` carries, if any.
    pub fn of_code(code: &str) -> Option<CodeFamily> {
        CodeFamily::ALL
            .into_iter()
            .find(|family| family.owns(code))
    }
}

impl fmt::Display for CodeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Next unused code for `family` given every code issued so far.
///
/// Codes that do not parse as members of the family are ignored, so the
/// scan may be handed a mixed set.
pub fn allocate_next<'a, I>(family: CodeFamily, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let last = existing
        .into_iter()
        .filter_map(|code| family.sequence_of(code))
        .max()
        .unwrap_or(0);
    family.format(last + 1)
}

#[cfg(test)]
mod tests {
    use std::iter;

    use super::{allocate_next, CodeFamily};

    #[test]
    fn first_allocation_starts_at_one() {
        assert_eq!(allocate_next(CodeFamily::Recommended, iter::empty()), "R00001");
        assert_eq!(allocate_next(CodeFamily::NotRecommended, iter::empty()), "NR00001");
        assert_eq!(allocate_next(CodeFamily::ManagementDecision, iter::empty()), "SCN00001");
        assert_eq!(allocate_next(CodeFamily::Recheck, iter::empty()), "RC0001");
    }

    #[test]
    fn repeated_allocation_yields_contiguous_increasing_codes() {
        for family in CodeFamily::ALL {
            let mut issued: Vec<String> = Vec::new();
            for _ in 0..25 {
                let next = allocate_next(family, issued.iter().map(String::as_str));
                issued.push(next);
            }
            let expected: Vec<String> = (1..=25).map(|n| family.format(n)).collect();
            assert_eq!(issued, expected);
            let sequences: Vec<u64> = issued
                .iter()
                .map(|code| family.sequence_of(code).unwrap())
                .collect();
            assert!(sequences.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn continues_from_the_highest_suffix_not_the_count() {
        let existing = ["R00002", "R00017", "R00005"];
        assert_eq!(
            allocate_next(CodeFamily::Recommended, existing),
            "R00018"
        );
    }

    #[test]
    fn ignores_codes_from_other_families_and_garbage() {
        let existing = ["RC0040", "NR00009", "R", "Rabc12", "R00003", "SCN00100"];
        assert_eq!(
            allocate_next(CodeFamily::Recommended, existing),
            "R00004"
        );
        assert_eq!(allocate_next(CodeFamily::Recheck, existing), "RC0041");
        assert_eq!(
            allocate_next(CodeFamily::NotRecommended, existing),
            "NR00010"
        );
    }

    #[test]
    fn recheck_scan_skips_reused_register_codes() {
        let existing = ["RC0001", "R00007", "NR00002", "RC0002"];
        assert_eq!(allocate_next(CodeFamily::Recheck, existing), "RC0003");
    }

    #[test]
    fn grows_past_the_padding_width() {
        assert_eq!(
            allocate_next(CodeFamily::Recheck, ["RC9999"]),
            "RC10000"
        );
        assert_eq!(CodeFamily::Recheck.sequence_of("RC10000"), Some(10_000));
    }

    #[test]
    fn identifies_the_family_of_a_code() {
        assert_eq!(CodeFamily::of_code("R00001"), Some(CodeFamily::Recommended));
        assert_eq!(CodeFamily::of_code("RC0001"), Some(CodeFamily::Recheck));
        assert_eq!(
            CodeFamily::of_code("SCN00003"),
            Some(CodeFamily::ManagementDecision)
        );
        assert_eq!(CodeFamily::of_code("X00001"), None);
    }

    #[test]
    fn lock_keys_are_distinct() {
        let mut keys: Vec<i64> = CodeFamily::ALL.iter().map(|f| f.lock_key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), CodeFamily::ALL.len());
    }
}
