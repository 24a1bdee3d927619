//! Matcher compiler: turns one field's include/exclude list into a reusable
//! predicate.
//!
//! Two families exist:
//! - value matchers: exact, case-sensitive set membership on categorical fields
//! - keyword matchers: case-insensitive substring containment on free text
//!
//! Compiled filters are immutable and shared behind `Arc`, so one compilation
//! serves every record of a recomputation (and, through
//! [`crate::MatcherCache`], later recomputations with the same list).

use std::collections::HashSet;
use std::sync::Arc;

use leadlens_core::{FilterMode, FilterValue};

/// Pre-partitioned include/exclude sets of a categorical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledValueFilter {
    include: HashSet<String>,
    exclude: HashSet<String>,
    include_blanks: bool,
}

impl CompiledValueFilter {
    pub fn compile(values: &[FilterValue], include_blanks: bool) -> Self {
        let mut include = HashSet::new();
        let mut exclude = HashSet::new();

        for filter in values {
            match filter.mode {
                FilterMode::Include => include.insert(filter.value.clone()),
                FilterMode::Exclude => exclude.insert(filter.value.clone()),
            };
        }

        Self {
            include,
            exclude,
            include_blanks,
        }
    }

    /// Evaluates a (possibly blank) field value.
    ///
    /// Blanks pass when the "include blanks" toggle is on, otherwise only when
    /// nothing is explicitly required. Exclusion wins over inclusion.
    pub fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return self.include_blanks || self.include.is_empty();
        };

        if self.exclude.contains(value) {
            return false;
        }

        if !self.include.is_empty() {
            return self.include.contains(value);
        }

        true
    }
}

/// Predicate over one categorical field.
#[derive(Debug, Clone, Default)]
pub enum ValueMatcher {
    /// Field is unconstrained.
    #[default]
    Any,
    Values(Arc<CompiledValueFilter>),
}

impl ValueMatcher {
    /// Compiles without consulting a cache.
    pub fn compile(values: &[FilterValue], include_blanks: bool) -> Self {
        if values.is_empty() {
            return Self::Any;
        }
        Self::Values(Arc::new(CompiledValueFilter::compile(values, include_blanks)))
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    #[inline]
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::Values(filter) => filter.matches(value),
        }
    }
}

/// Lowercased include/exclude keywords of a free-text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledKeywordFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl CompiledKeywordFilter {
    pub fn compile(values: &[FilterValue]) -> Self {
        let mut include = Vec::new();
        let mut exclude = Vec::new();

        for filter in values {
            let keyword = filter.value.to_lowercase();
            match filter.mode {
                FilterMode::Include => include.push(keyword),
                FilterMode::Exclude => exclude.push(keyword),
            }
        }

        Self { include, exclude }
    }

    /// Blank text is matched as the empty string.
    pub fn matches(&self, value: Option<&str>) -> bool {
        let lower = value.unwrap_or_default().to_lowercase();

        if self.exclude.iter().any(|k| lower.contains(k.as_str())) {
            return false;
        }

        if !self.include.is_empty() {
            return self.include.iter().any(|k| lower.contains(k.as_str()));
        }

        true
    }
}

/// Predicate over one free-text field.
#[derive(Debug, Clone, Default)]
pub enum KeywordMatcher {
    #[default]
    Any,
    Keywords(Arc<CompiledKeywordFilter>),
}

impl KeywordMatcher {
    /// Compiles without consulting a cache.
    pub fn compile(values: &[FilterValue]) -> Self {
        if values.is_empty() {
            return Self::Any;
        }
        Self::Keywords(Arc::new(CompiledKeywordFilter::compile(values)))
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Keywords(_))
    }

    #[inline]
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::Keywords(filter) => filter.matches(value),
        }
    }
}
