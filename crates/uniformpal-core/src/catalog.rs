//! Client-side query rules over a fetched collection: type filter, school
//! sort, substring search and removal by id.

use std::cmp::Ordering;

use crate::record::{SchoolType, UniformRecord};

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Restricts a listing to one school type, or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
  #[default]
  All,
  Primary,
  Secondary,
}

impl TypeFilter {
  pub fn matches(&self, school_type: SchoolType) -> bool {
    match self {
      Self::All => true,
      Self::Primary => school_type == SchoolType::Primary,
      Self::Secondary => school_type == SchoolType::Secondary,
    }
  }

  /// All → Primary → Secondary → All.
  pub fn next(self) -> Self {
    match self {
      Self::All => Self::Primary,
      Self::Primary => Self::Secondary,
      Self::Secondary => Self::All,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::All => "All",
      Self::Primary => "Primary",
      Self::Secondary => "Secondary",
    }
  }
}

// ─── Sort ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
  #[default]
  Ascending,
  Descending,
}

impl SortOrder {
  pub fn toggled(self) -> Self {
    match self {
      Self::Ascending => Self::Descending,
      Self::Descending => Self::Ascending,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Ascending => "A–Z",
      Self::Descending => "Z–A",
    }
  }
}

/// Case-insensitive comparison of school names.
pub fn compare_schools(a: &str, b: &str) -> Ordering { a.to_lowercase().cmp(&b.to_lowercase()) }

/// Apply `filter`, then sort by school in `order`.
///
/// The sort is stable: records with equal (case-folded) names keep their
/// relative input order in both directions.
pub fn filter_and_sort(
  records: &[UniformRecord],
  filter: TypeFilter,
  order: SortOrder,
) -> Vec<&UniformRecord> {
  let mut visible: Vec<&UniformRecord> = records
    .iter()
    .filter(|r| filter.matches(r.school_type))
    .collect();
  visible.sort_by(|a, b| match order {
    SortOrder::Ascending => compare_schools(&a.school, &b.school),
    SortOrder::Descending => compare_schools(&b.school, &a.school),
  });
  visible
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// Records whose school contains `query` as a case-insensitive substring.
///
/// A blank query matches nothing.
pub fn search<'a>(records: &'a [UniformRecord], query: &str) -> Vec<&'a UniformRecord> {
  if query.trim().is_empty() {
    return Vec::new();
  }
  let needle = query.to_lowercase();
  records
    .iter()
    .filter(|r| r.school.to_lowercase().contains(&needle))
    .collect()
}

// ─── Removal ─────────────────────────────────────────────────────────────────

/// Drop every record with `id`. Returns whether anything was removed.
pub fn remove_by_id(records: &mut Vec<UniformRecord>, id: &str) -> bool {
  let before = records.len();
  records.retain(|r| r.id != id);
  records.len() != before
}
