//! # Filter Query Builder
//!
//! Optional filter fields become a fixed-length conjunction of [`Term`]s. An absent field
//! still produces a term, [`Term::Always`], so "no filter" is part of the structure instead of
//! a clause that may or may not be appended.
//!
//! A [`Predicate`] has two consumers:
//! - SQL stores call [`Predicate::to_sql`], which emits numbered placeholders and the matching
//!   ordered parameter list. Values never end up in the statement text.
//! - The in-memory store calls [`Predicate::matches`] against any [`Subject`].
//!
//! ```rust
//! use inventory_stocks::model::StockFilter;
//! use inventory_stocks::query::{Predicate, SqlParam};
//!
//! let filter = StockFilter { shelf_min: Some(5), shelf_max: Some(5), ..Default::default() };
//! let fragment = Predicate::for_stocks(&filter).to_sql(1);
//!
//! assert_eq!(
//!     fragment.sql,
//!     "TRUE AND TRUE AND stocks.shelf_quantity >= $1 AND stocks.shelf_quantity <= $2 AND TRUE AND TRUE"
//! );
//! assert_eq!(fragment.params, vec![SqlParam::Int(5), SqlParam::Int(5)]);
//! ```

use crate::model::{Product, ProductFilter, StockFilter, StockListing};

/// A bound statement parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

/// One conjunct of a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// Matches every row.
    Always,
    PluEquals(String),
    /// Case-insensitive substring match on the product name.
    NameContains(String),
    ShopEquals(i64),
    ShelfAtLeast(i64),
    ShelfAtMost(i64),
    OrderAtLeast(i64),
    OrderAtMost(i64),
}

impl Term {
    fn from_option<T>(value: Option<T>, build: impl FnOnce(T) -> Term) -> Term {
        value.map(build).unwrap_or(Term::Always)
    }

    fn render(&self, placeholder: usize) -> (String, Option<SqlParam>) {
        let bound = |template: &str, param: SqlParam| {
            (template.replace("{}", &format!("${placeholder}")), Some(param))
        };
        match self {
            Term::Always => ("TRUE".to_string(), None),
            Term::PluEquals(plu) => bound("products.plu = {}", SqlParam::Text(plu.clone())),
            Term::NameContains(name) => bound(
                "strpos(lower(products.name), lower({})) > 0",
                SqlParam::Text(name.clone()),
            ),
            Term::ShopEquals(id) => bound("stocks.shop_id = {}", SqlParam::Int(*id)),
            Term::ShelfAtLeast(n) => bound("stocks.shelf_quantity >= {}", SqlParam::Int(*n)),
            Term::ShelfAtMost(n) => bound("stocks.shelf_quantity <= {}", SqlParam::Int(*n)),
            Term::OrderAtLeast(n) => bound("stocks.order_quantity >= {}", SqlParam::Int(*n)),
            Term::OrderAtMost(n) => bound("stocks.order_quantity <= {}", SqlParam::Int(*n)),
        }
    }

    fn matches<S: Subject + ?Sized>(&self, row: &S) -> bool {
        match self {
            Term::Always => true,
            Term::PluEquals(plu) => row.plu() == Some(plu.as_str()),
            Term::NameContains(needle) => row
                .name()
                .map(|name| name.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
            Term::ShopEquals(id) => row.shop_id() == Some(*id),
            Term::ShelfAtLeast(n) => row.shelf_quantity().is_some_and(|q| q >= *n),
            Term::ShelfAtMost(n) => row.shelf_quantity().is_some_and(|q| q <= *n),
            Term::OrderAtLeast(n) => row.order_quantity().is_some_and(|q| q >= *n),
            Term::OrderAtMost(n) => row.order_quantity().is_some_and(|q| q <= *n),
        }
    }
}

/// Columns a predicate can be evaluated against. Rows expose only the columns they carry;
/// a term on a missing column never matches.
pub trait Subject {
    fn plu(&self) -> Option<&str> {
        None
    }
    fn name(&self) -> Option<&str> {
        None
    }
    fn shop_id(&self) -> Option<i64> {
        None
    }
    fn shelf_quantity(&self) -> Option<i64> {
        None
    }
    fn order_quantity(&self) -> Option<i64> {
        None
    }
}

impl Subject for StockListing {
    fn plu(&self) -> Option<&str> {
        Some(&self.plu)
    }
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }
    fn shop_id(&self) -> Option<i64> {
        Some(self.stock.shop_id)
    }
    fn shelf_quantity(&self) -> Option<i64> {
        Some(self.stock.shelf_quantity)
    }
    fn order_quantity(&self) -> Option<i64> {
        Some(self.stock.order_quantity)
    }
}

impl Subject for Product {
    fn plu(&self) -> Option<&str> {
        Some(&self.plu)
    }
    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// Rendered `WHERE` body plus its parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

/// A conjunction of terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    terms: Vec<Term>,
}

impl Predicate {
    /// Stock ⨝ product filter: plu, shop, then shelf and order bounds.
    pub fn for_stocks(filter: &StockFilter) -> Self {
        Self {
            terms: vec![
                Term::from_option(filter.plu.clone(), Term::PluEquals),
                Term::from_option(filter.shop_id, Term::ShopEquals),
                Term::from_option(filter.shelf_min, Term::ShelfAtLeast),
                Term::from_option(filter.shelf_max, Term::ShelfAtMost),
                Term::from_option(filter.order_min, Term::OrderAtLeast),
                Term::from_option(filter.order_max, Term::OrderAtMost),
            ],
        }
    }

    /// Catalog filter: name substring, then exact plu.
    pub fn for_products(filter: &ProductFilter) -> Self {
        Self {
            terms: vec![
                Term::from_option(filter.name.clone(), Term::NameContains),
                Term::from_option(filter.plu.clone(), Term::PluEquals),
            ],
        }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Renders the conjunction, numbering placeholders from `first_placeholder`.
    pub fn to_sql(&self, first_placeholder: usize) -> SqlFragment {
        let mut clauses = Vec::with_capacity(self.terms.len());
        let mut params = Vec::new();
        for term in &self.terms {
            let (clause, param) = term.render(first_placeholder + params.len());
            clauses.push(clause);
            params.extend(param);
        }
        let sql = if clauses.is_empty() {
            "TRUE".to_string()
        } else {
            clauses.join(" AND ")
        };
        SqlFragment { sql, params }
    }

    pub fn matches<S: Subject + ?Sized>(&self, row: &S) -> bool {
        self.terms.iter().all(|term| term.matches(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Stock;

    fn listing(shop_id: i64, shelf: i64, order: i64, plu: &str) -> StockListing {
        StockListing {
            stock: Stock {
                id: 1,
                product_id: 1,
                shelf_quantity: shelf,
                order_quantity: order,
                shop_id,
            },
            plu: plu.to_string(),
            name: "Sparkling Water".to_string(),
        }
    }

    #[test]
    fn empty_filter_is_all_no_op_terms() {
        let predicate = Predicate::for_stocks(&StockFilter::default());
        assert_eq!(predicate.terms().len(), 6);
        assert!(predicate.terms().iter().all(|t| *t == Term::Always));

        let fragment = predicate.to_sql(1);
        assert_eq!(
            fragment.sql,
            "TRUE AND TRUE AND TRUE AND TRUE AND TRUE AND TRUE"
        );
        assert!(fragment.params.is_empty());
        assert!(predicate.matches(&listing(1, 0, 0, "X")));
    }

    #[test]
    fn values_are_bound_never_interpolated() {
        let filter = StockFilter {
            plu: Some("'; DROP TABLE stocks; --".to_string()),
            shop_id: Some(2),
            order_min: Some(1),
            ..Default::default()
        };
        let fragment = Predicate::for_stocks(&filter).to_sql(1);

        assert_eq!(
            fragment.sql,
            "products.plu = $1 AND stocks.shop_id = $2 AND TRUE AND TRUE AND stocks.order_quantity >= $3 AND TRUE"
        );
        assert!(!fragment.sql.contains("DROP"));
        assert_eq!(
            fragment.params,
            vec![
                SqlParam::Text("'; DROP TABLE stocks; --".to_string()),
                SqlParam::Int(2),
                SqlParam::Int(1),
            ]
        );
    }

    #[test]
    fn placeholders_start_at_the_requested_index() {
        let filter = ProductFilter {
            name: Some("water".to_string()),
            plu: Some("W-1".to_string()),
        };
        let fragment = Predicate::for_products(&filter).to_sql(3);
        assert_eq!(
            fragment.sql,
            "strpos(lower(products.name), lower($3)) > 0 AND products.plu = $4"
        );
    }

    #[test]
    fn in_memory_evaluation_matches_bounds_inclusively() {
        let filter = StockFilter {
            shelf_min: Some(5),
            shelf_max: Some(5),
            ..Default::default()
        };
        let predicate = Predicate::for_stocks(&filter);
        assert!(predicate.matches(&listing(1, 5, 0, "A")));
        assert!(!predicate.matches(&listing(1, 4, 0, "A")));
        assert!(!predicate.matches(&listing(1, 6, 0, "A")));
    }

    #[test]
    fn product_terms_do_not_match_missing_columns() {
        let product = Product::new(1, "W-1", "Sparkling Water");
        let by_name = Predicate::for_products(&ProductFilter {
            name: Some("WATER".to_string()),
            plu: None,
        });
        assert!(by_name.matches(&product));

        let by_shop = Predicate::for_stocks(&StockFilter {
            shop_id: Some(1),
            ..Default::default()
        });
        assert!(!by_shop.matches(&product));
    }
}
