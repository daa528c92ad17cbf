//! Minimal `.env` editing.

/// Set `key` in dotenv `content`, replacing an existing assignment or
/// appending a new line. Other lines are kept verbatim.
#[must_use]
pub fn upsert(content: &str, key: &str, value: &str) -> String {
    let line = format!("{key}=\"{}\"", value.replace('"', "\\\""));
    let mut replaced = false;
    let mut out: Vec<String> = content
        .lines()
        .map(|l| {
            let assigned = l
                .trim_start()
                .strip_prefix("export ")
                .unwrap_or(l.trim_start())
                .split_once('=')
                .is_some_and(|(k, _)| k.trim() == key);
            if assigned && !replaced {
                replaced = true;
                line.clone()
            } else {
                l.to_string()
            }
        })
        .collect();
    if !replaced {
        out.push(line);
    }
    let mut joined = out.join("\n");
    joined.push('\n');
    joined
}
