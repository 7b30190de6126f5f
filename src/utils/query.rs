use serde::{Deserialize, Serialize};
use serde_with::{serde_as, with_prefix, DisplayFromStr};

with_prefix!(order_by_prefix "order_by_");

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl From<Order> for sea_query::Order {
    fn from(order: Order) -> Self {
        match order {
            Order::Asc => sea_query::Order::Asc,
            Order::Desc => sea_query::Order::Desc,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct OrderBy<F> {
    pub field: F,
    pub direction: Order,
}

impl<F> OrderBy<F> {
    pub fn asc(field: F) -> Self {
        OrderBy {
            field,
            direction: Order::Asc,
        }
    }

    pub fn desc(field: F) -> Self {
        OrderBy {
            field,
            direction: Order::Desc,
        }
    }
}

/// List-query envelope shared by every collection endpoint. Deserialized
/// straight from the query string, e.g.
/// `?limit=20&order_by_field=Price&order_by_direction=Desc&shop_id=7`.
///
/// Every scalar goes through `DisplayFromStr`: with the flattened members
/// below, serde buffers all keys as strings before the typed fields see them.
#[serde_as]
#[derive(Serialize, Deserialize, Debug)]
pub struct Query<Opts, OrdF>
where
    for<'a> OrdF: serde::Deserialize<'a> + Serialize,
{
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<u16>,
    #[serde(flatten, with = "order_by_prefix")]
    pub order_by: Option<OrderBy<OrdF>>,
    #[serde(flatten)]
    pub options: Opts,
}

impl<Opts, OrdF> Default for Query<Opts, OrdF>
where
    Opts: Default,
    for<'a> OrdF: serde::Deserialize<'a> + Serialize,
{
    fn default() -> Self {
        Query {
            limit: None,
            order_by: None,
            options: Default::default(),
        }
    }
}
