//! SeaORM entities for the cliente tables.

pub mod metodo_pago;
pub mod usuario;
