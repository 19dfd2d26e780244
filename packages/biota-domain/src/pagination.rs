/// A resolved page request. `limit` is always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
	pub limit: u32,
	pub offset: u32,
}
impl PageWindow {
	/// Resolves raw query-string values.
	///
	/// `limit`: unparsable, missing or zero falls back to `default_limit`, then the value is
	/// clamped to `[1, max_limit]`. `offset`: unparsable or missing is zero, negative clamps
	/// to zero.
	pub fn from_raw(
		limit: Option<&str>,
		offset: Option<&str>,
		default_limit: u32,
		max_limit: u32,
	) -> Self {
		let max_limit = max_limit.max(1);
		let limit = match parse_integer(limit) {
			Some(0) | None => i64::from(default_limit),
			Some(value) => value,
		};
		let offset = parse_integer(offset).unwrap_or(0);

		Self {
			limit: limit.clamp(1, i64::from(max_limit)) as u32,
			offset: offset.clamp(0, i64::from(u32::MAX)) as u32,
		}
	}

	pub fn new(limit: u32, offset: u32) -> Self {
		Self { limit: limit.max(1), offset }
	}

	/// Number of items a page can hold once `total` matches exist.
	pub fn expected_len(&self, total: usize) -> usize {
		total.saturating_sub(self.offset as usize).min(self.limit as usize)
	}
}

/// One page of an ordered sequence together with the sequence's full length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
	pub items: Vec<T>,
	pub total: usize,
}

/// Slices `ordered` to `window`, preserving order. Never panics on out-of-range offsets.
pub fn paginate<T: Clone>(ordered: &[T], window: PageWindow) -> Page<T> {
	let total = ordered.len();
	let start = (window.offset as usize).min(total);
	let end = start.saturating_add(window.limit as usize).min(total);

	Page { items: ordered[start..end].to_vec(), total }
}

fn parse_integer(raw: Option<&str>) -> Option<i64> {
	raw.map(str::trim).filter(|value| !value.is_empty()).and_then(|value| value.parse().ok())
}
