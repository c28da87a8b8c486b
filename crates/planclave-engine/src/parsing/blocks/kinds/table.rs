/// Pipe table row (`| a | b |`).
pub struct TableRow;

impl TableRow {
    pub const PIPE: char = '|';

    /// True when the trimmed line starts with `|` and has at least one more `|`.
    pub fn matches(line: &str) -> bool {
        line.trim()
            .strip_prefix(Self::PIPE)
            .is_some_and(|rest| rest.contains(Self::PIPE))
    }

    /// True for a header separator row such as `|---|:-:|`.
    pub fn is_separator(line: &str) -> bool {
        let t = line.trim();
        let Some(inner) = t
            .strip_prefix(Self::PIPE)
            .and_then(|r| r.strip_suffix(Self::PIPE))
        else {
            return false;
        };
        !inner.is_empty()
            && inner
                .chars()
                .all(|c| c.is_whitespace() || matches!(c, ':' | '|' | '-'))
    }

    /// Splits a row into trimmed cells, dropping the outer pipes.
    pub fn cells(line: &str) -> Vec<String> {
        let t = line.trim();
        let t = t.strip_prefix(Self::PIPE).unwrap_or(t);
        let t = t.strip_suffix(Self::PIPE).unwrap_or(t);
        t.split(Self::PIPE).map(|c| c.trim().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("| a | b |", true)]
    #[case("  |a|", true)]
    #[case("|only one", false)]
    #[case("a | b", false)]
    #[case("", false)]
    fn row_detection(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(TableRow::matches(line), expected);
    }

    #[rstest]
    #[case("|---|---|", true)]
    #[case("| :--- | ---: |", true)]
    #[case("|:-:|", true)]
    #[case("| a | b |", false)]
    #[case("||", false)]
    fn separator_detection(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(TableRow::is_separator(line), expected);
    }

    #[test]
    fn cells_drop_outer_pipes() {
        assert_eq!(TableRow::cells("| A | B |"), vec!["A", "B"]);
        assert_eq!(TableRow::cells("|x|  y  "), vec!["x", "y"]);
        assert_eq!(TableRow::cells("| a || c |"), vec!["a", "", "c"]);
    }
}
