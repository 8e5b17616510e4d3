//! Movies, actors and the castings joining them.

mod coerce;
mod entity;

pub use coerce::{coerce_id, coerce_insert, coerce_update};
pub use entity::*;

/// One stored row keyed by column name; embedded includes appear as extra keys.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// `GET /movies`: each movie with `casting: [{ actor }]`.
pub static MOVIE_LIST_INCLUDE: Include = Include::Through {
    name: "casting",
    junction: &CASTING,
    fk: "movie_id",
    far_fk: "actor_id",
    far: &ACTOR,
    far_name: "actor",
};

/// `GET /movies/:id`: the movie with its full casting rows.
pub static MOVIE_DETAIL_INCLUDE: Include = Include::Rows {
    name: "casting",
    junction: &CASTING,
    fk: "movie_id",
};
