pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

/// Splits rendered SQL into executable statements, skipping blanks.
///
/// Function bodies must not contain `;` for this to hold.
pub fn statements(sql: &str) -> impl Iterator<Item = &str> {
	sql.split(';').map(str::trim).filter(|statement| !statement.is_empty())
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"00_extensions.sql" => out.push_str(include_str!("../../../sql/00_extensions.sql")),
				"tables/001_species.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_species.sql")),
				"tables/002_taxonomy_hierarchy.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_taxonomy_hierarchy.sql")),
				"tables/003_conservation_data.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_conservation_data.sql")),
				"tables/004_species_images.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_species_images.sql")),
				"functions/001_search_species.sql" =>
					out.push_str(include_str!("../../../sql/functions/001_search_species.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
