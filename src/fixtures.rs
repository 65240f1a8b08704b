#[cfg(test)]
pub mod test {
    use crate::parse::{self, Newline};

    /// Root property, a comment, and one section, LF terminated.
    pub const SAMPLE: &str =
        "GlobalProperty=1\n\n[ImportantStuff]\n;CommentedOut=5000\nNormal=42\n\n";

    /// One bare and one quoted string value.
    pub const QUOTED: &str = "Simple = Hello\nQuoted = \"World\"\n";

    /// Integers that need all 64 bits.
    pub const BIG: &str = "Big = 1152921504606846976\nBigNegative = -1152921504606846976\n";

    // -- Fixture exercising every corner of the dialect -------------------------

    /// Comments, malformed lines, quoting, a header sharing its line with a
    /// property, non-ASCII text and an unterminated last line.
    pub const MESSY: &str = concat!(
        "; leading comment\n",
        "Broken = \"unterminated\n",
        "Plain=1\n",
        "   Indented   =   spaced value   ; trailing\n",
        "\"Quoted Name\" = \"quoted \"\"value\"\"\"\n",
        "\n",
        "[Paths] Home = /home/user\n",
        "Temp = /tmp\n",
        "[]\n",
        "[ Spaced Header ]\n",
        "Empty =\n",
        "# done\n",
        "Größe = groß\n",
        "tail without newline",
    );

    #[test]
    fn fixtures_parse_without_losing_bytes() {
        for fixture in [SAMPLE, QUOTED, BIG, MESSY] {
            let parsed = parse::parse(fixture.as_bytes());
            let covered: usize = parsed.lines.iter().map(|l| l.range.len()).sum();
            assert_eq!(covered, fixture.len());
            assert_eq!(parsed.newline, Some(Newline::Lf));
        }
    }
}
