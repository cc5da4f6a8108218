use regex::Regex;

/// Merchant names that legitimately contain a boundary pattern.
pub(crate) const DEFAULT_EXCEPTIONS: &[&str] = &["BIG 5 SPORTING GOODS"];

/// A pattern marking where the stable part of a merchant description ends.
/// Evaluated together; the leftmost match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Boundary {
    /// Any character outside letters, digits, `-.,'*&/#` and space.
    Disallowed,
    /// `", "`
    CommaSpace,
    /// Space, optional letters, then a digit: `" F1567"`, `" 12AM"`.
    StoreCode,
    /// Space, `#`, digits: `" #0423"`.
    ReferenceNumber,
    /// Space followed by digits: `" 00042"`.
    NumericCode,
    /// Payment-processor suffix: `"*AB12CD3"`.
    StarCode,
}

impl Boundary {
    pub(crate) fn all() -> &'static [Boundary] {
        &[
            Self::Disallowed,
            Self::CommaSpace,
            Self::StoreCode,
            Self::ReferenceNumber,
            Self::NumericCode,
            Self::StarCode,
        ]
    }

    fn pattern(&self) -> &'static str {
        match self {
            Self::Disallowed => r"[^\w\-.,'*&/# ]|_",
            Self::CommaSpace => r", ",
            Self::StoreCode => r" [a-zA-Z]*\d",
            Self::ReferenceNumber => r" #\d*",
            Self::NumericCode => r" \d+",
            Self::StarCode => r"\*[a-zA-Z]*\d",
        }
    }

    /// Byte offset of this boundary's first match in `s`.
    pub(crate) fn find(&self, s: &str) -> Option<usize> {
        Regex::new(self.pattern())
            .ok()
            .and_then(|re| re.find(s))
            .map(|m| m.start())
    }
}

struct Matcher {
    boundary: Boundary,
    regex: Regex,
}

/// Truncates raw bank descriptions to a stable merchant key.
pub(crate) struct MerchantNormalizer {
    matchers: Vec<Matcher>,
    exceptions: Vec<String>,
}

impl Default for MerchantNormalizer {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl MerchantNormalizer {
    /// Build with the default exceptions plus `extra_exceptions`.
    pub(crate) fn new(extra_exceptions: &[String]) -> Self {
        let matchers = Boundary::all()
            .iter()
            .filter_map(|&boundary| {
                Regex::new(boundary.pattern())
                    .ok()
                    .map(|regex| Matcher { boundary, regex })
            })
            .collect();

        let mut exceptions: Vec<String> = DEFAULT_EXCEPTIONS
            .iter()
            .map(|s| s.to_uppercase())
            .chain(extra_exceptions.iter().map(|s| s.trim().to_uppercase()))
            .filter(|s| !s.is_empty())
            .collect();
        // Longest first so the most specific exception is protected.
        exceptions.sort_by_key(|s| std::cmp::Reverse(s.len()));
        exceptions.dedup();

        Self {
            matchers,
            exceptions,
        }
    }

    /// Cut `raw` at its leftmost boundary. A cut that would leave nothing
    /// keeps the whole description, trimmed.
    pub(crate) fn normalize(&self, raw: &str) -> String {
        let protected = self.protected_prefix_len(raw);
        let rest = &raw[protected..];

        match self.leftmost_boundary(rest) {
            Some((_, offset)) => {
                let cut = &raw[..protected + offset];
                if cut.trim().is_empty() {
                    raw.trim().to_string()
                } else {
                    cut.to_string()
                }
            }
            None => raw.to_string(),
        }
    }

    /// The boundary that truncates `s`, and where.
    pub(crate) fn leftmost_boundary(&self, s: &str) -> Option<(Boundary, usize)> {
        self.matchers
            .iter()
            .filter_map(|m| m.regex.find(s).map(|found| (m.boundary, found.start())))
            .min_by_key(|&(_, offset)| offset)
    }

    fn protected_prefix_len(&self, raw: &str) -> usize {
        let upper = raw.to_uppercase();
        // Uppercasing can change byte lengths outside ASCII; only trust ASCII prefixes.
        if upper.len() != raw.len() {
            return 0;
        }
        self.exceptions
            .iter()
            .find(|e| upper.starts_with(e.as_str()))
            .map(|e| e.len())
            .filter(|&n| raw.is_char_boundary(n))
            .unwrap_or(0)
    }
}
