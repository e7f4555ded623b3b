/// Fixed ordered set of instruments the relay subscribes to.
///
/// Configured once at startup and immutable for the process lifetime. The
/// order is preserved: upstream subscriptions are sent in this order on every
/// (re)connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedSymbols(Vec<String>);

impl TrackedSymbols {
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TrackedSymbols(symbols.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.0.iter().any(|s| s == symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}
