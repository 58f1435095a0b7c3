// Input data: champion lookup, column schema, and the player-season table.

pub mod champions;
pub mod schema;
pub mod table;
