/// Characters that would corrupt a pattern-matching clause.
const STRIPPED: [char; 4] = [',', '%', '(', ')'];

/// Removes pattern-breaking characters and surrounding whitespace.
///
/// An empty result means the caller supplied no effective term; it must not be sent to the
/// rank provider or turned into a substring filter.
pub fn sanitize(raw: &str) -> String {
	let stripped: String = raw.chars().filter(|ch| !STRIPPED.contains(ch)).collect();

	stripped.trim().to_string()
}

/// [`sanitize`] that maps the empty result to `None`.
pub fn effective_term(raw: Option<&str>) -> Option<String> {
	raw.map(sanitize).filter(|term| !term.is_empty())
}

/// Escapes `LIKE`/`ILIKE` metacharacters so `value` matches literally. Uses `\` as the escape
/// character, which is the Postgres default.
pub fn escape_like(value: &str) -> String {
	let mut out = String::with_capacity(value.len());

	for ch in value.chars() {
		if matches!(ch, '\\' | '%' | '_') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}

/// `%<escaped value>%`, for case-insensitive substring matching.
pub fn contains_pattern(value: &str) -> String {
	format!("%{}%", escape_like(value))
}
