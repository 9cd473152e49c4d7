// src/common/text.rs

// Helpers de texto usados pelo montador do relatório e pelos renderizadores.

pub const PLACEHOLDER: &str = "N/A";
pub const UNTITLED: &str = "Untitled";
pub const ELLIPSIS: &str = "...";

/// Corta `text` em `max_chars` caracteres e acrescenta `...`.
/// Textos dentro do limite voltam intactos; aplicar de novo não muda o resultado.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str(ELLIPSIS);
    cut
}

/// Texto não vazio ou o placeholder.
pub fn or_placeholder(value: Option<String>, placeholder: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| placeholder.to_string())
}

/// "Admin Dashboard Report" -> "admin-dashboard-report"
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "report".to_string()
    } else {
        slug
    }
}

/// "totalUsers" / "total_users" -> "Total Users"
pub fn humanize_key(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in key.chars() {
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
            current.push(c);
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
