mod csv_export;
mod csv_import;

pub(crate) use csv_export::write_expenses;
pub(crate) use csv_import::read_expenses;
