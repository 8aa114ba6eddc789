/// Derive the backend monitor slug from a job type name.
///
/// Module paths are dropped from the type and from each generic argument,
/// and the result is converted to lowercase snake case, so
/// `app::Export<app::Csv>` becomes `export_csv` and distinct instantiations
/// of a generic job get distinct monitors. Acronyms stay together:
/// `HTTPHealthCheck` becomes `http_health_check`. Any character outside
/// `[A-Za-z0-9]` acts as a word separator, so a name already in slug form is
/// returned unchanged.
///
/// Two types with the same name in different modules share a slug; such jobs
/// should override [`MonitoredJob::job_type_name`](crate::MonitoredJob::job_type_name).
#[must_use]
pub fn monitor_slug(type_name: &str) -> String {
    let simple = strip_module_paths(type_name);
    let chars: Vec<char> = simple.chars().collect();

    let mut slug = String::with_capacity(simple.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            push_separator(&mut slug);
            continue;
        }
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                push_separator(&mut slug);
            }
        }
        slug.push(c.to_ascii_lowercase());
    }

    slug.trim_end_matches('_').to_owned()
}

/// Replaces every `a::b::C` path in a type name with its last segment.
fn strip_module_paths(type_name: &str) -> String {
    let mut out = String::with_capacity(type_name.len());
    let mut path = String::new();
    for c in type_name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == ':' {
            path.push(c);
        } else {
            out.push_str(last_segment(&path));
            path.clear();
            out.push(c);
        }
    }
    out.push_str(last_segment(&path));
    out
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

fn push_separator(slug: &mut String) {
    if !slug.is_empty() && !slug.ends_with('_') {
        slug.push('_');
    }
}
