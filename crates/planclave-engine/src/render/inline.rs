use std::sync::OnceLock;

use regex::{Captures, Regex};

struct InlineRules {
    code: Regex,
    bold: Regex,
    strike: Regex,
    em_star: Regex,
    em_underscore: Regex,
    link: Regex,
}

fn rules() -> &'static InlineRules {
    static RULES: OnceLock<InlineRules> = OnceLock::new();
    RULES.get_or_init(|| InlineRules {
        code: Regex::new(r"`([^`]+)`").expect("Invalid code span regex"),
        bold: Regex::new(r"\*\*(.+?)\*\*").expect("Invalid bold regex"),
        strike: Regex::new(r"~~(.+?)~~").expect("Invalid strikethrough regex"),
        em_star: Regex::new(r"\*(.+?)\*").expect("Invalid emphasis regex"),
        em_underscore: Regex::new(r"_(.+?)_").expect("Invalid emphasis regex"),
        link: Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("Invalid link regex"),
    })
}

/// Renders one run of inline markup to HTML that is safe to embed.
///
/// The pass order is fixed: escape `&`, `<`, `>` first, then code spans,
/// `**strong**`, `~~del~~`, `*em*` / `_em_`, and finally `[text](url)`.
/// Each pass is a non-greedy replace over the previous pass's output, so
/// emphasis never spans a line break and same-kind nesting is not supported.
/// Text without any delimiter comes back escaped and otherwise unchanged.
pub fn render_inline(text: &str) -> String {
    let r = rules();
    let html = html_escape::encode_text(text);
    let html = r.code.replace_all(&html, "<code>${1}</code>");
    let html = r.bold.replace_all(&html, "<strong>${1}</strong>");
    let html = r.strike.replace_all(&html, "<del>${1}</del>");
    let html = r.em_star.replace_all(&html, "<em>${1}</em>");
    let html = r.em_underscore.replace_all(&html, "<em>${1}</em>");
    let html = r.link.replace_all(&html, |caps: &Captures<'_>| {
        // `"` survives the escape pass and would otherwise end the attribute.
        let href = caps[2].replace('"', "&quot;");
        format!(
            r#"<a href="{href}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            &caps[1]
        )
    });
    html.into_owned()
}
