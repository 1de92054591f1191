//! Header blocks of messages and body parts.

use crate::encoding::decode_rfc2047;

/// Header fields in the order they appeared.
///
/// Lookups ignore ASCII case; a repeated field keeps all its values.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    fields: Vec<(String, String)>,
}

impl Headers {
    /// An empty header block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    fn matching<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> {
        self.fields
            .iter()
            .filter(move |(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// First value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.matching(name).next()
    }

    /// Every value of `name`, first to last.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.matching(name).collect()
    }

    /// First value of `name` with RFC 2047 encoded words decoded.
    ///
    /// A value that fails to decode is returned raw.
    #[must_use]
    pub fn get_decoded(&self, name: &str) -> Option<String> {
        let raw = self.get(name)?;
        Some(decode_rfc2047(raw).unwrap_or_else(|e| {
            tracing::debug!("Keeping undecodable {name} header: {e}");
            raw.to_string()
        }))
    }

    /// Number of fields, counting repeats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the block had no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parses a header block up to the first blank line.
    ///
    /// Folded lines are joined with a single space. Lines with no colon
    /// are dropped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let fields = unfold(text)
            .filter_map(|line| {
                let (name, value) = line.split_once(':')?;
                Some((name.trim().to_string(), value.trim().to_string()))
            })
            .collect();
        Self { fields }
    }
}

/// Joins continuation lines onto the field they belong to.
fn unfold(text: &str) -> impl Iterator<Item = String> + '_ {
    let mut lines = text.lines().take_while(|line| !line.is_empty()).peekable();

    std::iter::from_fn(move || {
        // Continuation lines with nothing to continue are skipped.
        let mut logical = loop {
            let line = lines.next()?;
            if !line.starts_with([' ', '\t']) {
                break line.trim_end().to_string();
            }
        };
        while let Some(next) = lines.next_if(|line| line.starts_with([' ', '\t'])) {
            logical.push(' ');
            logical.push_str(next.trim());
        }
        Some(logical)
    })
}
