//! Encoding and decoding helpers between Rust domain types and the columns
//! stored in SQLite.
//!
//! Dates are stored as `YYYY-MM-DD` strings. Row mappers read columns by
//! name, so every `SELECT` feeding them must use the table's own column
//! names.

use chrono::NaiveDate;
use rusqlite::{Row, types::Type};

use quadro_core::{
  address::{Address, City},
  person::{Person, Photo},
  posting::Posting,
  servant::{PermanentServant, TemporaryServant},
  unit::Unit,
};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn encode_opt_date(d: Option<NaiveDate>) -> Option<String> { d.map(encode_date) }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

fn date(row: &Row<'_>, column: &str) -> rusqlite::Result<NaiveDate> {
  let text: String = row.get(column)?;
  decode_date(&text).map_err(|e| conversion_failure(row, column, e))
}

fn opt_date(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<NaiveDate>> {
  let text: Option<String> = row.get(column)?;
  text
    .as_deref()
    .map(decode_date)
    .transpose()
    .map_err(|e| conversion_failure(row, column, e))
}

fn conversion_failure(row: &Row<'_>, column: &str, err: Error) -> rusqlite::Error {
  let idx = row.as_ref().column_index(column).unwrap_or_default();
  rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

// ─── Column lists ────────────────────────────────────────────────────────────

pub const PERSON_COLUMNS: &str =
  "pes_id, pes_nome, pes_data_nascimento, pes_sexo, pes_mae, pes_pai, pes_cpf";
pub const CITY_COLUMNS: &str = "cid_id, cid_nome, cid_uf";
pub const ADDRESS_COLUMNS: &str = "end_id, cid_id, end_tipo_logradouro, end_logradouro, \
                                   end_numero, end_complemento, end_bairro";
pub const UNIT_COLUMNS: &str = "unid_id, unid_nome, unid_sigla";
pub const POSTING_COLUMNS: &str =
  "lot_id, pes_id, unid_id, lot_data_lotacao, lot_data_remocao, lot_portaria";
pub const PHOTO_COLUMNS: &str = "ft_id, pes_id, ft_data, ft_bucket, ft_hash";

// ─── Row mappers ─────────────────────────────────────────────────────────────

pub fn person(row: &Row<'_>) -> rusqlite::Result<Person> {
  Ok(Person {
    id:          row.get("pes_id")?,
    name:        row.get("pes_nome")?,
    birth_date:  date(row, "pes_data_nascimento")?,
    sex:         row.get("pes_sexo")?,
    mother_name: row.get("pes_mae")?,
    father_name: row.get("pes_pai")?,
    cpf:         row.get("pes_cpf")?,
  })
}

pub fn city(row: &Row<'_>) -> rusqlite::Result<City> {
  Ok(City {
    id:    row.get("cid_id")?,
    name:  row.get("cid_nome")?,
    state: row.get("cid_uf")?,
  })
}

pub fn address(row: &Row<'_>) -> rusqlite::Result<Address> {
  Ok(Address {
    id:           row.get("end_id")?,
    city_id:      row.get("cid_id")?,
    street_type:  row.get("end_tipo_logradouro")?,
    street:       row.get("end_logradouro")?,
    number:       row.get("end_numero")?,
    complement:   row.get("end_complemento")?,
    neighborhood: row.get("end_bairro")?,
  })
}

pub fn unit(row: &Row<'_>) -> rusqlite::Result<Unit> {
  Ok(Unit {
    id:      row.get("unid_id")?,
    name:    row.get("unid_nome")?,
    acronym: row.get("unid_sigla")?,
  })
}

pub fn posting(row: &Row<'_>) -> rusqlite::Result<Posting> {
  Ok(Posting {
    id:          row.get("lot_id")?,
    person_id:   row.get("pes_id")?,
    unit_id:     row.get("unid_id")?,
    assigned_on: date(row, "lot_data_lotacao")?,
    removed_on:  opt_date(row, "lot_data_remocao")?,
    order_ref:   row.get("lot_portaria")?,
  })
}

pub fn photo(row: &Row<'_>) -> rusqlite::Result<Photo> {
  Ok(Photo {
    id:        row.get("ft_id")?,
    person_id: row.get("pes_id")?,
    taken_on:  date(row, "ft_data")?,
    bucket:    row.get("ft_bucket")?,
    hash:      row.get("ft_hash")?,
  })
}

pub fn permanent(row: &Row<'_>) -> rusqlite::Result<PermanentServant> {
  Ok(PermanentServant {
    person_id:    row.get("pes_id")?,
    registration: row.get("se_matricula")?,
  })
}

pub fn temporary(row: &Row<'_>) -> rusqlite::Result<TemporaryServant> {
  Ok(TemporaryServant {
    person_id:    row.get("pes_id")?,
    admitted_on:  date(row, "st_data_admissao")?,
    dismissed_on: opt_date(row, "st_data_demissao")?,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_use_iso_calendar_format() {
    let d = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
    assert_eq!(encode_date(d), "2024-02-09");
    assert_eq!(decode_date("2024-02-09").unwrap(), d);
    assert!(matches!(decode_date("09/02/2024"), Err(Error::DateParse(_))));
  }
}
