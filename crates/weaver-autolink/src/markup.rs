use crate::config::ProfileFormConfig;
use crate::resolver::ResolvedProfile;

pub const ADDRESS_OPEN: &str = "<a href=\"";
pub const ADDRESS_MIDDLE: &str = "\" target=\"_blank\">";
pub const ADDRESS_CLOSE: &str = "</a>";

/// Bytes added around every address, whatever its length.
pub const ADDRESS_OVERHEAD: usize = ADDRESS_OPEN.len() + ADDRESS_MIDDLE.len() + ADDRESS_CLOSE.len();

/// Markup wrapped around one resolved `@name` occurrence.
///
/// The reference text is written once between `prefix` and `middle` (as the
/// submitted form value) and once between `middle` and `suffix` (as the
/// visible button label).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMarkup {
    pub prefix: String,
    pub middle: String,
    pub suffix: String,
}

impl NameMarkup {
    pub fn build(form: &ProfileFormConfig, profile: &ResolvedProfile) -> Self {
        let mut prefix = String::from("<form method=\"post\" action=\"");
        escape_attr(&mut prefix, &form.action_url);
        prefix.push_str("\"><input type=\"hidden\" name=\"");
        escape_attr(&mut prefix, &form.id_param);
        prefix.push_str("\" value=\"");
        escape_attr(&mut prefix, &profile.encoded_id);
        prefix.push_str("\"><input type=\"hidden\" name=\"usr\" value=\"");

        let mut middle = String::from("\"><button type=\"submit\" class=\"");
        escape_attr(&mut middle, &form.button_class);
        middle.push_str("\">");

        let mut suffix = String::from("</button></form>");
        suffix.push_str(&profile.caption);
        suffix.push_str(&profile.avatar);

        Self {
            prefix,
            middle,
            suffix,
        }
    }

    /// Combined length of the three fragments.
    pub fn overhead(&self) -> usize {
        self.prefix.len() + self.middle.len() + self.suffix.len()
    }
}

/// Append `value` to `out` escaped for use inside a double-quoted attribute.
pub fn escape_attr(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
