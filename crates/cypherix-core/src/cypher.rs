//! Cypher statement builder.
//!
//! A [`CypherQuery`] accumulates fragments and bound parameters while the
//! factory registry walks a predicate tree, then renders the final statement
//! in a counting and a fetching variant. Rendering is a pure function of the
//! fragment sequence, the sort clause and the page window, so two builders fed
//! the same calls produce byte-identical text.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::predicate::{Combinator, SortSpec, SortType};
use crate::value::Value;

/// Variable every statement binds the matched entity to.
pub const ENTITY: &str = "n";

/// Bound parameters, ordered by name.
pub type Parameters = BTreeMap<String, Value>;

/// Backtick-quote an identifier for use as a property key or label.
pub fn quote(identifier: &str) -> String {
    format!("`{}`", identifier.replace('`', "``"))
}

/// `n.`key``
pub fn property(key: &str) -> String {
    format!("{ENTITY}.{}", quote(key))
}

/// Whether a statement matches nodes or relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Node,
    Relationship,
}

impl EntityKind {
    /// `MATCH` clause binding the entity variable.
    pub fn query_prefix(&self, type_label: Option<&str>, source_label: Option<&str>, target_label: Option<&str>) -> String {
        let label = |l: Option<&str>| l.map(|l| format!(":{}", quote(l))).unwrap_or_default();

        match self {
            EntityKind::Node => format!("MATCH ({ENTITY}{})", label(type_label)),
            EntityKind::Relationship => format!(
                "MATCH (s{})-[{ENTITY}{}]->(t{})",
                label(source_label),
                label(type_label),
                label(target_label)
            ),
        }
    }

    /// `RETURN` clause; the count variant projects a single `count` column.
    pub fn query_suffix(&self, do_count: bool) -> String {
        if do_count {
            format!(" RETURN COUNT({ENTITY}) AS count")
        } else {
            format!(" RETURN DISTINCT {ENTITY}")
        }
    }
}

/// One piece of a composite clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    /// Name of a parameter already bound on the query.
    Param(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Clause {
    Simple {
        key: String,
        operator: String,
        /// `None` renders a `NULL` literal instead of a parameter.
        param: Option<String>,
        case_insensitive: bool,
        is_property: bool,
    },
    Composite(Vec<Part>),
}

#[derive(Debug, Clone, PartialEq)]
enum Fragment {
    And,
    Or,
    Not,
    Open,
    Close,
    Clause(Clause),
}

/// Position in the builder that [`CypherQuery::rollback`] can return to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    fragments: usize,
    bound: usize,
    groups: usize,
}

/// Statement builder for one logical query.
#[derive(Debug, Clone)]
pub struct CypherQuery {
    kind: EntityKind,
    type_label: Option<String>,
    source_label: Option<String>,
    target_label: Option<String>,
    fragments: Vec<Fragment>,
    parameters: Parameters,
    /// (parameter name, base name) in bind order.
    bound: Vec<(String, String)>,
    name_counts: HashMap<String, usize>,
    groups: Vec<Combinator>,
    sort: Option<SortSpec>,
    page_size: usize,
    page: usize,
    limit: Option<usize>,
    offset: usize,
}

impl CypherQuery {
    pub fn new(kind: EntityKind, page_size: usize) -> Self {
        Self {
            kind,
            type_label: None,
            source_label: None,
            target_label: None,
            fragments: Vec::new(),
            parameters: Parameters::new(),
            bound: Vec::new(),
            name_counts: HashMap::new(),
            groups: Vec::new(),
            sort: None,
            page_size: page_size.max(1),
            page: 0,
            limit: None,
            offset: 0,
        }
    }

    pub fn with_labels(mut self, type_label: Option<String>, source_label: Option<String>, target_label: Option<String>) -> Self {
        self.type_label = type_label;
        self.source_label = source_label;
        self.target_label = target_label;
        self
    }

    /// Restrict the stream to `limit` rows starting at `offset`.
    pub fn with_limit(mut self, limit: Option<usize>, offset: usize) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    // ----- fragments -----

    pub fn and(&mut self) {
        self.fragments.push(Fragment::And);
    }

    pub fn or(&mut self) {
        self.fragments.push(Fragment::Or);
    }

    pub fn not(&mut self) {
        self.fragments.push(Fragment::Not);
    }

    /// Open a parenthesised group whose `Must` children join with `combinator`.
    pub fn begin_group(&mut self, combinator: Combinator) {
        self.groups.push(combinator);
        self.fragments.push(Fragment::Open);
    }

    pub fn end_group(&mut self) {
        self.groups.pop();
        self.fragments.push(Fragment::Close);
    }

    /// Combinator of the innermost open group, `And` at the root.
    pub fn current_combinator(&self) -> Combinator {
        self.groups.last().copied().unwrap_or_default()
    }

    /// `n.`name` operator $param`, binding `value` under a fresh name.
    pub fn add_simple_parameter(&mut self, name: &str, operator: &str, value: Value) {
        self.add_parameter(name, operator, value, false, true);
    }

    /// Full form of [`CypherQuery::add_simple_parameter`].
    ///
    /// `case_insensitive` wraps the left-hand side in `toLower(...)`;
    /// `is_property` reads `name` as a property of the matched entity rather
    /// than a raw expression. A null value renders `NULL` and binds nothing.
    pub fn add_parameter(&mut self, name: &str, operator: &str, value: Value, case_insensitive: bool, is_property: bool) {
        let param = if value.is_null() {
            None
        } else {
            Some(self.bind(name, value))
        };

        self.fragments.push(Fragment::Clause(Clause::Simple {
            key: name.to_string(),
            operator: operator.to_string(),
            param,
            case_insensitive,
            is_property,
        }));
    }

    /// `n.`name` operator NULL` with no bound parameter.
    pub fn add_null_test(&mut self, name: &str, operator: &str) {
        self.add_parameter(name, operator, Value::Null, false, true);
    }

    /// Append a clause assembled from text and parameters bound via [`CypherQuery::bind`].
    pub fn add_composite(&mut self, parts: Vec<Part>) {
        self.fragments.push(Fragment::Clause(Clause::Composite(parts)));
    }

    /// Bind `value` under a name derived from `key`; repeated keys get a
    /// positional suffix (`age_param`, `age_param_1`, ...).
    pub fn bind(&mut self, key: &str, value: Value) -> String {
        let base = format!("{}_param", sanitize(key));
        let count = self.name_counts.entry(base.clone()).or_insert(0);
        let name = if *count == 0 {
            base.clone()
        } else {
            format!("{base}_{count}")
        };
        *count += 1;

        self.parameters.insert(name.clone(), value.read_value());
        self.bound.push((name.clone(), base));
        name
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            fragments: self.fragments.len(),
            bound: self.bound.len(),
            groups: self.groups.len(),
        }
    }

    /// Discard every fragment and parameter added after `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.fragments.truncate(checkpoint.fragments);
        self.groups.truncate(checkpoint.groups);
        while self.bound.len() > checkpoint.bound {
            let Some((name, base)) = self.bound.pop() else {
                break;
            };
            self.parameters.remove(&name);
            if let Some(count) = self.name_counts.get_mut(&base) {
                *count -= 1;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    // ----- sort and paging -----

    /// Set the terminal sort clause; later calls overwrite earlier ones.
    pub fn sort(&mut self, sort_type: SortType, key: &str, descending: bool) {
        self.sort = Some(SortSpec {
            key: key.to_string(),
            sort_type,
            descending,
        });
    }

    pub fn sort_spec(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn next_page(&mut self) {
        self.page += 1;
    }

    pub fn is_limited(&self) -> bool {
        self.limit.is_some()
    }

    /// `(skip, limit)` of the current page, or `None` once the requested
    /// limit has been consumed.
    pub fn page_window(&self) -> Option<(usize, usize)> {
        let consumed = self.page * self.page_size;
        let take = match self.limit {
            Some(limit) if consumed >= limit => return None,
            Some(limit) => self.page_size.min(limit - consumed),
            None => self.page_size,
        };
        Some((self.offset.saturating_add(consumed), take))
    }

    // ----- rendering -----

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Render the statement.
    ///
    /// The count variant projects `COUNT(n)` and never carries a sort clause
    /// or page window. The fetch variant appends `ORDER BY` when `with_sort`
    /// is set and a sort key exists, followed by the current page window.
    pub fn statement(&self, for_count: bool, with_sort: bool) -> String {
        let mut buf = self.kind.query_prefix(
            self.type_label.as_deref(),
            self.source_label.as_deref(),
            self.target_label.as_deref(),
        );

        if !self.fragments.is_empty() {
            buf.push_str(" WHERE ");
            for fragment in &self.fragments {
                render_fragment(&mut buf, fragment);
            }
        }

        buf.push_str(&self.kind.query_suffix(for_count));

        if !for_count {
            if let (true, Some(sort)) = (with_sort, &self.sort) {
                let key = property(&sort.key);
                let order = match sort.sort_type {
                    SortType::Lexical => key,
                    SortType::Numeric => format!("toFloat({key})"),
                };
                write!(buf, " ORDER BY {order}").ok();
                if sort.descending {
                    buf.push_str(" DESC");
                }
            }

            if let Some((skip, limit)) = self.page_window() {
                write!(buf, " SKIP {skip} LIMIT {limit}").ok();
            }
        }

        buf
    }

    /// Structural hash used as the result count cache key.
    ///
    /// Covers the match shape and the fragment sequence with parameter
    /// values in place of parameter names. Sort and paging are excluded since
    /// they never change the row count.
    pub fn hash_code(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.kind.hash(&mut hasher);
        self.type_label.hash(&mut hasher);
        self.source_label.hash(&mut hasher);
        self.target_label.hash(&mut hasher);

        for fragment in &self.fragments {
            match fragment {
                Fragment::And => 0u8.hash(&mut hasher),
                Fragment::Or => 1u8.hash(&mut hasher),
                Fragment::Not => 2u8.hash(&mut hasher),
                Fragment::Open => 3u8.hash(&mut hasher),
                Fragment::Close => 4u8.hash(&mut hasher),
                Fragment::Clause(Clause::Simple {
                    key,
                    operator,
                    param,
                    case_insensitive,
                    is_property,
                }) => {
                    5u8.hash(&mut hasher);
                    key.hash(&mut hasher);
                    operator.hash(&mut hasher);
                    case_insensitive.hash(&mut hasher);
                    is_property.hash(&mut hasher);
                    param.as_ref().and_then(|p| self.parameters.get(p)).hash(&mut hasher);
                }
                Fragment::Clause(Clause::Composite(parts)) => {
                    6u8.hash(&mut hasher);
                    for part in parts {
                        match part {
                            Part::Text(text) => text.hash(&mut hasher),
                            Part::Param(name) => self.parameters.get(name).hash(&mut hasher),
                        }
                    }
                }
            }
        }

        hasher.finish()
    }
}

fn render_fragment(buf: &mut String, fragment: &Fragment) {
    match fragment {
        Fragment::And => buf.push_str(" AND "),
        Fragment::Or => buf.push_str(" OR "),
        Fragment::Not => buf.push_str("NOT "),
        Fragment::Open => buf.push('('),
        Fragment::Close => buf.push(')'),
        Fragment::Clause(Clause::Simple {
            key,
            operator,
            param,
            case_insensitive,
            is_property,
        }) => {
            let lhs = if *is_property { property(key) } else { key.clone() };
            if *case_insensitive {
                write!(buf, "toLower({lhs})").ok();
            } else {
                buf.push_str(&lhs);
            }
            write!(buf, " {operator} ").ok();
            match param {
                Some(name) => {
                    buf.push('$');
                    buf.push_str(name);
                }
                None => buf.push_str("NULL"),
            }
        }
        Fragment::Clause(Clause::Composite(parts)) => {
            for part in parts {
                match part {
                    Part::Text(text) => buf.push_str(text),
                    Part::Param(name) => {
                        buf.push('$');
                        buf.push_str(name);
                    }
                }
            }
        }
    }
}

/// Parameter names must be plain identifiers.
fn sanitize(key: &str) -> String {
    let mut out: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, 'p');
    }
    out
}
