//! Listing view state carried in the URL query string.
//!
//! The query string is the only source of truth for filters, page and sort.
//! [`ListingQuery`] keeps its pairs in order and only changes through pure
//! transitions. [`ScanListingState`] is the typed reading of it.

use std::collections::BTreeSet;
use std::str::FromStr;

use scanboard_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::scan::{NodeType, ScanSort, ScanSortField};

const PAGE_PARAM: &str = "page";
const SORT_BY_PARAM: &str = "sortby";
const DESC_PARAM: &str = "desc";

/// Filter facets recognized in the listing query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterParam {
    /// Scan status.
    #[serde(rename = "status")]
    Status,
    /// Host node ids.
    #[serde(rename = "hosts")]
    Hosts,
    /// Container node ids.
    #[serde(rename = "containers")]
    Containers,
    /// Container image node ids.
    #[serde(rename = "containerImages")]
    ContainerImages,
    /// Languages; used both as node ids and as trigger matches.
    #[serde(rename = "languages")]
    Languages,
    /// Kubernetes cluster ids.
    #[serde(rename = "clusters")]
    Clusters,
    /// Node type.
    #[serde(rename = "nodeType")]
    NodeType,
}

impl FilterParam {
    /// Every facet, in query-string order.
    pub const ALL: [Self; 7] = [
        Self::Status,
        Self::Hosts,
        Self::Containers,
        Self::ContainerImages,
        Self::Languages,
        Self::Clusters,
        Self::NodeType,
    ];

    /// Returns the query parameter name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Hosts => "hosts",
            Self::Containers => "containers",
            Self::ContainerImages => "containerImages",
            Self::Languages => "languages",
            Self::Clusters => "clusters",
            Self::NodeType => "nodeType",
        }
    }
}

/// One user interaction on the listing view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListingTransition {
    /// Adds a facet value.
    Append {
        /// Facet.
        param: FilterParam,
        /// Value.
        value: String,
    },
    /// Removes a facet value.
    Remove {
        /// Facet.
        param: FilterParam,
        /// Value.
        value: String,
    },
    /// Adds the value when absent, removes it otherwise.
    Toggle {
        /// Facet.
        param: FilterParam,
        /// Value.
        value: String,
    },
    /// Replaces all values of a facet (multi-select).
    Replace {
        /// Facet.
        param: FilterParam,
        /// New values.
        values: Vec<String>,
    },
    /// Removes all values of a facet.
    Clear {
        /// Facet.
        param: FilterParam,
    },
    /// Moves to a page.
    Page {
        /// Zero-based page index.
        page: u32,
    },
    /// Orders by one column.
    Sort {
        /// Column.
        field: ScanSortField,
        /// Direction.
        descending: bool,
    },
    /// Removes ordering.
    ClearSort,
}

/// Ordered `name=value` pairs of the listing URL query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pairs: Vec<(String, String)>,
}

impl ListingQuery {
    /// Parses a URL-encoded query string, with or without a leading `?`.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let pairs = form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();

        Self { pairs }
    }

    /// Serializes back to a URL-encoded query string without a leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish()
    }

    /// Returns all values of a parameter in order.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(pair_name, _)| pair_name == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the first value of a parameter.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(pair_name, _)| pair_name == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns whether the exact pair is present.
    #[must_use]
    pub fn contains(&self, param: FilterParam, value: &str) -> bool {
        self.values(param.as_str()).any(|existing| existing == value)
    }

    /// Applies one interaction.
    #[must_use]
    pub fn apply(&self, transition: &ListingTransition) -> Self {
        match transition {
            ListingTransition::Append { param, value } => self.append(*param, value),
            ListingTransition::Remove { param, value } => self.remove(*param, value),
            ListingTransition::Toggle { param, value } => self.toggle(*param, value),
            ListingTransition::Replace { param, values } => self.replace(*param, values),
            ListingTransition::Clear { param } => self.clear(*param),
            ListingTransition::Page { page } => self.with_page(*page),
            ListingTransition::Sort { field, descending } => self.with_sort(*field, *descending),
            ListingTransition::ClearSort => self.without_sort(),
        }
    }

    /// Adds a facet value unless it is already present.
    #[must_use]
    pub fn append(&self, param: FilterParam, value: &str) -> Self {
        if self.contains(param, value) {
            return self.clone();
        }

        let mut pairs = self.pairs.clone();
        pairs.push((param.as_str().to_owned(), value.to_owned()));
        Self { pairs }.with_page_reset()
    }

    /// Removes a facet value.
    #[must_use]
    pub fn remove(&self, param: FilterParam, value: &str) -> Self {
        if !self.contains(param, value) {
            return self.clone();
        }

        self.retain(|name, pair_value| !(name == param.as_str() && pair_value == value))
            .with_page_reset()
    }

    /// Appends an absent value, removes a present one.
    #[must_use]
    pub fn toggle(&self, param: FilterParam, value: &str) -> Self {
        if self.contains(param, value) {
            self.remove(param, value)
        } else {
            self.append(param, value)
        }
    }

    /// Replaces every value of a facet.
    #[must_use]
    pub fn replace(&self, param: FilterParam, values: &[String]) -> Self {
        let mut deduplicated: Vec<&str> = Vec::with_capacity(values.len());
        for value in values {
            if !deduplicated.contains(&value.as_str()) {
                deduplicated.push(value.as_str());
            }
        }

        let current: Vec<&str> = self.values(param.as_str()).collect();
        if current == deduplicated {
            return self.clone();
        }

        let mut next = self.retain(|name, _| name != param.as_str());
        next.pairs.extend(
            deduplicated
                .into_iter()
                .map(|value| (param.as_str().to_owned(), value.to_owned())),
        );
        next.with_page_reset()
    }

    /// Removes every value of a facet.
    #[must_use]
    pub fn clear(&self, param: FilterParam) -> Self {
        if self.first(param.as_str()).is_none() {
            return self.clone();
        }

        self.retain(|name, _| name != param.as_str())
            .with_page_reset()
    }

    /// Sets the page; page zero is the default and is left out of the query.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        if page == 0 {
            return self.retain(|name, _| name != PAGE_PARAM);
        }

        self.with_single(PAGE_PARAM, page.to_string())
    }

    /// Orders by one column.
    #[must_use]
    pub fn with_sort(&self, field: ScanSortField, descending: bool) -> Self {
        self.with_single(SORT_BY_PARAM, field.as_str().to_owned())
            .with_single(DESC_PARAM, descending.to_string())
    }

    /// Removes ordering.
    #[must_use]
    pub fn without_sort(&self) -> Self {
        self.retain(|name, _| name != SORT_BY_PARAM && name != DESC_PARAM)
    }

    fn with_page_reset(self) -> Self {
        self.retain(|name, _| name != PAGE_PARAM)
    }

    fn with_single(&self, name: &str, value: String) -> Self {
        let mut pairs = Vec::with_capacity(self.pairs.len() + 1);
        let mut replaced = false;
        for (pair_name, pair_value) in &self.pairs {
            if pair_name != name {
                pairs.push((pair_name.clone(), pair_value.clone()));
            } else if !replaced {
                pairs.push((pair_name.clone(), value.clone()));
                replaced = true;
            }
        }
        if !replaced {
            pairs.push((name.to_owned(), value));
        }

        Self { pairs }
    }

    fn retain(&self, keep: impl Fn(&str, &str) -> bool) -> Self {
        Self {
            pairs: self
                .pairs
                .iter()
                .filter(|(name, value)| keep(name.as_str(), value.as_str()))
                .cloned()
                .collect(),
        }
    }
}

/// Unordered facet selections of the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanFilterSelection {
    /// Status values as typed in the query.
    pub status: BTreeSet<String>,
    /// Host node ids.
    pub hosts: BTreeSet<String>,
    /// Container node ids.
    pub containers: BTreeSet<String>,
    /// Container image node ids.
    pub container_images: BTreeSet<String>,
    /// Languages.
    pub languages: BTreeSet<String>,
    /// Cluster ids.
    pub clusters: BTreeSet<String>,
    /// Node types.
    pub node_types: BTreeSet<NodeType>,
}

/// Typed reading of a [`ListingQuery`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanListingState {
    /// Facet selections.
    pub filters: ScanFilterSelection,
    /// Zero-based page index.
    pub page: u32,
    /// Optional ordering.
    pub sort: Option<ScanSort>,
}

impl ScanListingState {
    /// Reads the recognized parameters; unknown parameters are ignored.
    pub fn from_query(query: &ListingQuery) -> AppResult<Self> {
        let facet = |param: FilterParam| -> BTreeSet<String> {
            query
                .values(param.as_str())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        };

        let node_types = facet(FilterParam::NodeType)
            .iter()
            .map(|value| NodeType::from_str(value))
            .collect::<AppResult<BTreeSet<_>>>()?;

        let page = match query.first(PAGE_PARAM).map(str::trim) {
            None | Some("") => 0,
            Some(value) => value.parse::<u32>().map_err(|_| {
                AppError::Validation(format!("page must be a non-negative integer, got '{value}'"))
            })?,
        };

        let sort = match query.first(SORT_BY_PARAM).map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(ScanSort {
                field: ScanSortField::from_str(value)?,
                descending: query.first(DESC_PARAM) == Some("true"),
            }),
        };

        Ok(Self {
            filters: ScanFilterSelection {
                status: facet(FilterParam::Status),
                hosts: facet(FilterParam::Hosts),
                containers: facet(FilterParam::Containers),
                container_images: facet(FilterParam::ContainerImages),
                languages: facet(FilterParam::Languages),
                clusters: facet(FilterParam::Clusters),
                node_types,
            },
            page,
            sort,
        })
    }

    /// Transition produced by clicking a column header.
    ///
    /// Cycles unsorted, ascending, descending, unsorted.
    #[must_use]
    pub fn header_click(&self, field: ScanSortField) -> ListingTransition {
        match self.sort {
            Some(sort) if sort.field == field && sort.descending => ListingTransition::ClearSort,
            Some(sort) if sort.field == field => ListingTransition::Sort {
                field,
                descending: true,
            },
            _ => ListingTransition::Sort {
                field,
                descending: false,
            },
        }
    }
}
