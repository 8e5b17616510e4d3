//! Static entity definitions: tables, columns, keys and relations.

/// Storage type of a column. Drives SQL casts and body coercion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    Text,
    Timestamp,
}

impl ColumnKind {
    /// PostgreSQL type name for `$n::type` casts.
    pub fn pg_type(self) -> &'static str {
        match self {
            ColumnKind::Int => "int4",
            ColumnKind::Text => "text",
            ColumnKind::Timestamp => "timestamptz",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ColumnInfo {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
    /// Filled by storage (identity, timestamps). Clients cannot write it.
    pub generated: bool,
}

const fn column(name: &'static str, kind: ColumnKind, nullable: bool) -> ColumnInfo {
    ColumnInfo {
        name,
        kind,
        nullable,
        generated: false,
    }
}

const fn generated(name: &'static str, kind: ColumnKind) -> ColumnInfo {
    ColumnInfo {
        name,
        kind,
        nullable: false,
        generated: true,
    }
}

/// A column holding another table's primary key.
#[derive(Clone, Debug)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references: &'static str,
}

#[derive(Debug)]
pub struct Entity {
    /// Singular name used in messages ("movie").
    pub name: &'static str,
    pub table_name: &'static str,
    pub columns: &'static [ColumnInfo],
    pub foreign_keys: &'static [ForeignKey],
    pub unique: &'static [&'static [&'static str]],
}

/// Every entity's primary key column.
pub const PK: &str = "id";
pub const UPDATED_AT: &str = "updated_at";

impl Entity {
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Foreign keys of this entity that point at `table`.
    pub fn foreign_keys_to<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a ForeignKey> + 'a {
        self.foreign_keys.iter().filter(move |fk| fk.references == table)
    }
}

pub static MOVIE: Entity = Entity {
    name: "movie",
    table_name: "movies",
    columns: &[
        generated(PK, ColumnKind::Int),
        column("title", ColumnKind::Text, false),
        column("release_year", ColumnKind::Int, true),
        column("genre", ColumnKind::Text, true),
        generated("created_at", ColumnKind::Timestamp),
        generated(UPDATED_AT, ColumnKind::Timestamp),
    ],
    foreign_keys: &[],
    unique: &[],
};

pub static ACTOR: Entity = Entity {
    name: "actor",
    table_name: "actors",
    columns: &[
        generated(PK, ColumnKind::Int),
        column("name", ColumnKind::Text, false),
        column("birth_year", ColumnKind::Int, true),
        column("nationality", ColumnKind::Text, true),
        generated("created_at", ColumnKind::Timestamp),
        generated(UPDATED_AT, ColumnKind::Timestamp),
    ],
    foreign_keys: &[],
    unique: &[],
};

/// Junction between movies and actors.
pub static CASTING: Entity = Entity {
    name: "casting",
    table_name: "castings",
    columns: &[
        generated(PK, ColumnKind::Int),
        column("movie_id", ColumnKind::Int, false),
        column("actor_id", ColumnKind::Int, false),
        column("character_name", ColumnKind::Text, true),
    ],
    foreign_keys: &[
        ForeignKey {
            column: "movie_id",
            references: "movies",
        },
        ForeignKey {
            column: "actor_id",
            references: "actors",
        },
    ],
    unique: &[&["movie_id", "actor_id"]],
};

/// All entities, parents before children.
pub static ENTITIES: [&Entity; 3] = [&MOVIE, &ACTOR, &CASTING];

/// Related rows embedded in a read under `name`.
#[derive(Clone, Copy, Debug)]
pub enum Include {
    /// Junction rows embedded whole: `"casting": [{ "movie_id", "actor_id", ... }]`.
    Rows {
        name: &'static str,
        junction: &'static Entity,
        /// Junction column pointing back at the parent row.
        fk: &'static str,
    },
    /// Junction rows projected to the far side: `"casting": [{ "actor": { ... } }]`.
    Through {
        name: &'static str,
        junction: &'static Entity,
        fk: &'static str,
        /// Junction column pointing at the far entity.
        far_fk: &'static str,
        far: &'static Entity,
        far_name: &'static str,
    },
}

impl Include {
    pub fn name(&self) -> &'static str {
        match self {
            Include::Rows { name, .. } | Include::Through { name, .. } => *name,
        }
    }
}
