//! Filter requests and their compiled predicate form.
//!
//! A [`FilterRequest`] is what a caller asks for. Compiling it against a
//! [`GenerationTable`] yields a [`CompiledFilter`] whose predicates separate
//! "no filter requested" from "filter requested that nothing can satisfy",
//! so blank searches, the `"all"` type sentinel and unknown generations each
//! land in the right case before any record is looked at.

use crate::errors::{QueryError, QueryParamResult};
use crate::generations::GenerationTable;
use schema::{IdRange, PokemonRecord, PokemonType};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Type value that disables the type filter.
pub const ALL_TYPES_SENTINEL: &str = "all";

/// Page size bounds applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    pub default_per_page: u32,
    pub max_per_page: u32,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: MAX_PER_PAGE,
        }
    }
}

/// A typed filter request. Absent fields mean "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, rename = "type")]
    pub type_filter: Option<String>,
    #[serde(default)]
    pub generation: Option<u32>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    DEFAULT_PAGE as i64
}

fn default_per_page() -> i64 {
    DEFAULT_PER_PAGE as i64
}

impl Default for FilterRequest {
    fn default() -> Self {
        Self {
            search: None,
            type_filter: None,
            generation: None,
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl FilterRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_filter = Some(type_name.into());
        self
    }

    pub fn generation(mut self, generation: u32) -> Self {
        self.generation = Some(generation);
        self
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn per_page(mut self, per_page: i64) -> Self {
        self.per_page = per_page;
        self
    }

    /// Validates pagination and resolves every predicate.
    pub fn compile(
        &self,
        generations: &GenerationTable,
        limits: QueryLimits,
    ) -> QueryParamResult<CompiledQuery> {
        let window = PageWindow::new(self.page, self.per_page, limits.max_per_page)?;
        let filter = CompiledFilter {
            search: self.search.as_deref().and_then(SearchTerm::new),
            type_filter: TypeFilter::resolve(self.type_filter.as_deref()),
            generation: GenerationFilter::resolve(self.generation, generations),
        };
        Ok(CompiledQuery { filter, window })
    }
}

/// Untyped parameters exactly as a query string or tool call delivers them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawFilterParams {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub type_filter: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub generation: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub page: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub per_page: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

/// Accepts a JSON string or number and keeps it as text, so numeric values
/// reach the same parsing and error reporting as query-string values.
pub fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Unsigned(number) => number.to_string(),
            TextOrNumber::Signed(number) => number.to_string(),
            TextOrNumber::Float(number) => number.to_string(),
        }),
    )
}

impl RawFilterParams {
    /// Parses pagination strictly and filters leniently: a non-integer page
    /// is an error, a non-integer generation simply matches nothing.
    pub fn into_request(self, limits: QueryLimits) -> QueryParamResult<RawRequest> {
        let page = parse_pagination("page", self.page.as_deref(), DEFAULT_PAGE)?;
        let per_page =
            parse_pagination("per_page", self.per_page.as_deref(), limits.default_per_page)?;

        let generation = match self.generation.as_deref().map(str::trim) {
            None | Some("") => GenerationParam::Absent,
            Some(value) => match value.parse::<u32>() {
                Ok(number) => GenerationParam::Number(number),
                Err(_) => GenerationParam::Unparseable(value.to_string()),
            },
        };

        Ok(RawRequest {
            request: FilterRequest {
                search: self.search,
                type_filter: self.type_filter,
                generation: match generation {
                    GenerationParam::Number(number) => Some(number),
                    _ => None,
                },
                page,
                per_page,
            },
            unparseable_generation: match generation {
                GenerationParam::Unparseable(value) => Some(value),
                _ => None,
            },
        })
    }
}

enum GenerationParam {
    Absent,
    Number(u32),
    Unparseable(String),
}

/// A request parsed from raw parameters. A generation value that was present
/// but not a number is kept so it can still force an empty result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
    pub request: FilterRequest,
    pub unparseable_generation: Option<String>,
}

impl RawRequest {
    pub fn compile(
        &self,
        generations: &GenerationTable,
        limits: QueryLimits,
    ) -> QueryParamResult<CompiledQuery> {
        let mut compiled = self.request.compile(generations, limits)?;
        if self.unparseable_generation.is_some() {
            compiled.filter.generation = GenerationFilter::Unmatched(None);
        }
        Ok(compiled)
    }
}

fn parse_pagination(name: &'static str, value: Option<&str>, default: u32) -> QueryParamResult<i64> {
    match value.map(str::trim) {
        None | Some("") => Ok(i64::from(default)),
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| QueryError::invalid(name, raw, "must be an integer")),
    }
}

/// A trimmed, lowercased, non-empty name fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// `None` for empty or whitespace-only input: a stray space must not hide
    /// the whole collection.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_lowercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeFilter {
    Any,
    Only(PokemonType),
    /// A type name outside the vocabulary; matches no record.
    Unmatched(String),
}

impl TypeFilter {
    pub fn resolve(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim) else {
            return TypeFilter::Any;
        };
        if raw.is_empty() || raw.eq_ignore_ascii_case(ALL_TYPES_SENTINEL) {
            return TypeFilter::Any;
        }
        match PokemonType::parse_name(raw) {
            Some(pokemon_type) => TypeFilter::Only(pokemon_type),
            None => TypeFilter::Unmatched(raw.to_string()),
        }
    }

    /// Matches on any of the record's types, secondary included.
    pub fn matches(&self, record: &PokemonRecord) -> bool {
        match self {
            TypeFilter::Any => true,
            TypeFilter::Only(pokemon_type) => record.has_type(*pokemon_type),
            TypeFilter::Unmatched(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationFilter {
    Any,
    Range { generation: u32, range: IdRange },
    /// The requested generation is not configured (or was not a number).
    Unmatched(Option<u32>),
}

impl GenerationFilter {
    pub fn resolve(generation: Option<u32>, generations: &GenerationTable) -> Self {
        match generation {
            None => GenerationFilter::Any,
            Some(generation) => match generations.range_for_generation(generation) {
                Some(range) => GenerationFilter::Range { generation, range },
                None => GenerationFilter::Unmatched(Some(generation)),
            },
        }
    }

    pub fn matches(&self, pokemon_id: u32) -> bool {
        match self {
            GenerationFilter::Any => true,
            GenerationFilter::Range { range, .. } => range.contains(pokemon_id),
            GenerationFilter::Unmatched(_) => false,
        }
    }
}

/// The conjunction of all active predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFilter {
    pub search: Option<SearchTerm>,
    pub type_filter: TypeFilter,
    pub generation: GenerationFilter,
}

impl Default for CompiledFilter {
    fn default() -> Self {
        Self {
            search: None,
            type_filter: TypeFilter::Any,
            generation: GenerationFilter::Any,
        }
    }
}

impl CompiledFilter {
    pub fn matches(&self, record: &PokemonRecord) -> bool {
        self.generation.matches(record.pokemon_id)
            && self.type_filter.matches(record)
            && self
                .search
                .as_ref()
                .map_or(true, |term| term.matches(&record.name))
    }

    /// True when some predicate can never be satisfied, so the store need
    /// not be scanned for matches.
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self.type_filter, TypeFilter::Unmatched(_))
            || matches!(self.generation, GenerationFilter::Unmatched(_))
    }
}

impl fmt::Display for CompiledFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(term) = &self.search {
            parts.push(format!("name contains '{}'", term.as_str()));
        }
        match &self.type_filter {
            TypeFilter::Any => {}
            TypeFilter::Only(pokemon_type) => parts.push(format!("type {}", pokemon_type)),
            TypeFilter::Unmatched(raw) => parts.push(format!("unknown type '{}'", raw)),
        }
        match &self.generation {
            GenerationFilter::Any => {}
            GenerationFilter::Range { generation, range } => {
                parts.push(format!("generation {} ({})", generation, range))
            }
            GenerationFilter::Unmatched(Some(generation)) => {
                parts.push(format!("unknown generation {}", generation))
            }
            GenerationFilter::Unmatched(None) => parts.push("unknown generation".to_string()),
        }

        if parts.is_empty() {
            write!(f, "all Pokemon")
        } else {
            write!(f, "{}", parts.join(" and "))
        }
    }
}

/// A validated offset/limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub per_page: u32,
}

impl PageWindow {
    /// Rejects non-positive values; clamps `per_page` to `max_per_page`.
    pub fn new(page: i64, per_page: i64, max_per_page: u32) -> QueryParamResult<Self> {
        if page < 1 {
            return Err(QueryError::invalid("page", page, "must be at least 1"));
        }
        if per_page < 1 {
            return Err(QueryError::invalid("per_page", per_page, "must be at least 1"));
        }
        let page = page as u64;
        let per_page = per_page.min(i64::from(max_per_page.max(1))) as u32;
        Ok(Self { page, per_page })
    }

    /// Saturates for pages far past any collection; such pages are empty.
    pub fn offset(&self) -> usize {
        usize::try_from(self.page - 1)
            .unwrap_or(usize::MAX)
            .saturating_mul(self.per_page as usize)
    }

    pub fn limit(&self) -> usize {
        self.per_page as usize
    }
}

/// A compiled filter plus its pagination window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    pub filter: CompiledFilter,
    pub window: PageWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub page: u64,
    pub per_page: u32,
    pub total: usize,
    pub pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationInfo {
    pub fn new(window: PageWindow, total: usize) -> Self {
        let pages = total.div_ceil(window.per_page as usize);
        Self {
            page: window.page,
            per_page: window.per_page,
            total,
            pages,
            has_next: window.page < pages as u64,
            has_prev: window.page > 1,
        }
    }
}

/// One page of matches plus the size of the full filtered set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub results: Vec<PokemonRecord>,
    pub total_count: usize,
    pub pagination: PaginationInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("", None)]
    #[case("   ", None)]
    #[case("\t\n", None)]
    #[case(" Char ", Some("char"))]
    fn search_terms_trim_and_lowercase(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(SearchTerm::new(raw).as_ref().map(SearchTerm::as_str), expected);
    }

    #[rstest]
    #[case(None, TypeFilter::Any)]
    #[case(Some("all"), TypeFilter::Any)]
    #[case(Some("ALL"), TypeFilter::Any)]
    #[case(Some(" "), TypeFilter::Any)]
    #[case(Some("Poison"), TypeFilter::Only(PokemonType::Poison))]
    #[case(Some("shadow"), TypeFilter::Unmatched("shadow".to_string()))]
    fn type_filter_resolution(#[case] raw: Option<&str>, #[case] expected: TypeFilter) {
        assert_eq!(TypeFilter::resolve(raw), expected);
    }

    #[test]
    fn unknown_generation_is_unmatched_not_an_error() {
        let table = GenerationTable::default();
        let compiled = FilterRequest::new()
            .generation(42)
            .compile(&table, QueryLimits::default())
            .unwrap();
        assert_eq!(compiled.filter.generation, GenerationFilter::Unmatched(Some(42)));
        assert!(compiled.filter.is_unsatisfiable());
    }

    #[rstest]
    #[case(0, 20, "page")]
    #[case(-3, 20, "page")]
    #[case(1, 0, "per_page")]
    #[case(1, -1, "per_page")]
    fn rejects_non_positive_pagination(
        #[case] page: i64,
        #[case] per_page: i64,
        #[case] field: &str,
    ) {
        let err = PageWindow::new(page, per_page, MAX_PER_PAGE).unwrap_err();
        let QueryError::InvalidQueryParameter { name, .. } = err;
        assert_eq!(name, field);
    }

    #[test]
    fn clamps_per_page() {
        let window = PageWindow::new(3, 500, MAX_PER_PAGE).unwrap();
        assert_eq!(window.per_page, 100);
        assert_eq!(window.offset(), 200);
    }

    #[test]
    fn raw_params_reject_non_integer_pagination() {
        let params = RawFilterParams {
            page: Some("two".to_string()),
            ..Default::default()
        };
        let err = params.into_request(QueryLimits::default()).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidQueryParameter {
                name: "page",
                value: "two".to_string(),
                reason: "must be an integer",
            }
        );

        let params = RawFilterParams {
            per_page: Some("1.5".to_string()),
            ..Default::default()
        };
        assert!(params.into_request(QueryLimits::default()).is_err());
    }

    #[test]
    fn raw_params_use_defaults_and_keep_bad_generation() {
        let params = RawFilterParams {
            generation: Some("kanto".to_string()),
            ..Default::default()
        };
        let raw = params.into_request(QueryLimits::default()).unwrap();
        assert_eq!(raw.request.page, 1);
        assert_eq!(raw.request.per_page, 20);
        assert_eq!(raw.unparseable_generation.as_deref(), Some("kanto"));

        let compiled = raw
            .compile(&GenerationTable::default(), QueryLimits::default())
            .unwrap();
        assert_eq!(compiled.filter.generation, GenerationFilter::Unmatched(None));
    }

    #[test]
    fn pagination_info_flags() {
        let window = PageWindow::new(2, 2, MAX_PER_PAGE).unwrap();
        let info = PaginationInfo::new(window, 5);
        assert_eq!(info.pages, 3);
        assert!(info.has_next);
        assert!(info.has_prev);

        let empty = PaginationInfo::new(PageWindow::new(1, 20, MAX_PER_PAGE).unwrap(), 0);
        assert_eq!(empty.pages, 0);
        assert!(!empty.has_next);
        assert!(!empty.has_prev);
    }

    #[test]
    fn filter_description() {
        let compiled = FilterRequest::new()
            .search("saur")
            .type_name("poison")
            .generation(1)
            .compile(&GenerationTable::default(), QueryLimits::default())
            .unwrap();
        assert_eq!(
            compiled.filter.to_string(),
            "name contains 'saur' and type poison and generation 1 (#001-#151)"
        );
        assert_eq!(CompiledFilter::default().to_string(), "all Pokemon");
    }

    #[test]
    fn raw_params_accept_json_numbers_and_strings() {
        let params: RawFilterParams =
            serde_json::from_str(r#"{"page": 2, "per_page": 5, "generation": 1}"#).unwrap();
        assert_eq!(params.page.as_deref(), Some("2"));
        assert_eq!(params.per_page.as_deref(), Some("5"));
        assert_eq!(params.generation.as_deref(), Some("1"));

        let mixed: RawFilterParams =
            serde_json::from_str(r#"{"type": "fire", "page": "3", "generation": null}"#).unwrap();
        assert_eq!(mixed.page.as_deref(), Some("3"));
        assert_eq!(mixed.generation, None);
        assert_eq!(mixed.per_page, None);

        let request = params.into_request(QueryLimits::default()).unwrap().request;
        assert_eq!((request.page, request.per_page, request.generation), (2, 5, Some(1)));
    }

    #[test]
    fn raw_params_from_json_still_reject_bad_pagination() {
        let negative: RawFilterParams = serde_json::from_str(r#"{"page": -1}"#).unwrap();
        let raw = negative.into_request(QueryLimits::default()).unwrap();
        assert!(raw
            .compile(&GenerationTable::default(), QueryLimits::default())
            .is_err());

        let fractional: RawFilterParams = serde_json::from_str(r#"{"per_page": 2.5}"#).unwrap();
        assert!(fractional.into_request(QueryLimits::default()).is_err());
    }

    #[test]
    fn deserializes_with_type_key_and_defaults() {
        let request: FilterRequest =
            serde_json::from_str(r#"{"type": "fire", "generation": 1}"#).unwrap();
        assert_eq!(request.type_filter.as_deref(), Some("fire"));
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, 20);
    }
}
