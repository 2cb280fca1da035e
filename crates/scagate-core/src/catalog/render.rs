use crate::catalog::model::Catalog;

/// Render the catalog as a Markdown parameter table.
pub fn render_markdown(catalog: &Catalog) -> String {
    let mut out = String::new();
    out.push_str(&format!("Parameters from `{}`\n\n", catalog.source_name));
    out.push_str("| Variable | Flag | Type | Commands | Description | Example |\n");
    out.push_str("|---|---|---|---|---|---|\n");
    for s in catalog.specs() {
        let flag = if s.is_action_only() {
            "_(action only)_".to_string()
        } else {
            format!("`{}`", s.flag)
        };
        let commands = if s.applicable_commands.is_empty() {
            "all".to_string()
        } else {
            s.applicable_commands.join(", ")
        };
        out.push_str(&format!(
            "| `{}` | {} | {} | {} | {} | {} |\n",
            s.env_name,
            flag,
            s.value_kind.as_type_str(),
            commands,
            escape_cell(&s.description),
            escape_cell(&s.example),
        ));
    }
    out
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
