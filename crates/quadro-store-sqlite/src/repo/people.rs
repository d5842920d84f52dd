//! People, their address links and their photos.

use rusqlite::{Connection, params};

use quadro_core::{
  Entity,
  page::{Page, PageRequest},
  person::{NewPerson, NewPhoto, Person, PersonDetail, PersonPatch, Photo},
};

use super::{find, is_taken, load, paginate, places, postings};
use crate::{
  Result,
  encode::{self, PERSON_COLUMNS, PHOTO_COLUMNS, encode_date},
  guard::{Guard, invalid},
};

pub const CPF_TAKEN: &str = "the CPF has already been taken";

/// Whether another person already holds `cpf`. `None` is never taken.
pub fn cpf_taken(conn: &Connection, cpf: Option<&str>, except: Option<i64>) -> Result<bool> {
  match cpf {
    Some(cpf) => is_taken(conn, Entity::Person, "pes_cpf", cpf, except),
    None => Ok(false),
  }
}

pub fn create(conn: &Connection, input: NewPerson) -> Result<Person> {
  if cpf_taken(conn, input.cpf.as_deref(), None)? {
    return Err(invalid("pes_cpf", CPF_TAKEN));
  }
  conn.execute(
    "INSERT INTO pessoas (pes_nome, pes_data_nascimento, pes_sexo, pes_mae, pes_pai, pes_cpf)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![
      input.name,
      encode_date(input.birth_date),
      input.sex,
      input.mother_name,
      input.father_name,
      input.cpf,
    ],
  )?;
  let person = Person {
    id:          conn.last_insert_rowid(),
    name:        input.name,
    birth_date:  input.birth_date,
    sex:         input.sex,
    mother_name: input.mother_name,
    father_name: input.father_name,
    cpf:         input.cpf,
  };
  tracing::info!(pes_id = person.id, "person created");
  Ok(person)
}

pub fn load_person(conn: &Connection, id: i64) -> Result<Person> {
  load(conn, Entity::Person, id, PERSON_COLUMNS, encode::person)
}

fn detail(conn: &Connection, person: Person) -> Result<PersonDetail> {
  let addresses = places::linked_addresses(conn, "pessoas_enderecos", "pes_id", person.id)?;
  let postings = postings::of_person(conn, person.id)?;
  Ok(PersonDetail { person, addresses, postings })
}

pub fn get(conn: &Connection, id: i64) -> Result<Option<PersonDetail>> {
  find(conn, Entity::Person, id, PERSON_COLUMNS, encode::person)?
    .map(|person| detail(conn, person))
    .transpose()
}

pub fn update(conn: &Connection, id: i64, patch: PersonPatch) -> Result<Person> {
  let mut person = load_person(conn, id)?;
  if patch.is_empty() {
    return Ok(person);
  }
  if let Some(Some(cpf)) = &patch.cpf
    && cpf_taken(conn, Some(cpf.as_str()), Some(id))?
  {
    return Err(invalid("pes_cpf", CPF_TAKEN));
  }
  patch.apply(&mut person);
  conn.execute(
    "UPDATE pessoas SET
       pes_nome = ?1, pes_data_nascimento = ?2, pes_sexo = ?3, pes_mae = ?4, pes_pai = ?5,
       pes_cpf = ?6
     WHERE pes_id = ?7",
    params![
      person.name,
      encode_date(person.birth_date),
      person.sex,
      person.mother_name,
      person.father_name,
      person.cpf,
      id,
    ],
  )?;
  tracing::info!(pes_id = id, "person updated");
  Ok(person)
}

pub fn list(conn: &Connection, request: PageRequest) -> Result<Page<PersonDetail>> {
  let page = paginate(conn, "pessoas", PERSON_COLUMNS, "pes_id", request, encode::person)?;
  let data = page
    .data
    .into_iter()
    .map(|person| detail(conn, person))
    .collect::<Result<Vec<_>>>()?;
  Ok(Page { data, meta: page.meta })
}

// ─── Photos ──────────────────────────────────────────────────────────────────

pub fn add_photo(conn: &Connection, person_id: i64, input: NewPhoto) -> Result<Photo> {
  Guard(conn).require(Entity::Person, person_id)?;
  if is_taken(conn, Entity::Photo, "ft_hash", &input.hash, None)? {
    return Err(invalid("ft_hash", "the hash has already been taken"));
  }
  conn.execute(
    "INSERT INTO fotos_pessoas (pes_id, ft_data, ft_bucket, ft_hash) VALUES (?1, ?2, ?3, ?4)",
    params![person_id, encode_date(input.taken_on), input.bucket, input.hash],
  )?;
  let photo = Photo {
    id: conn.last_insert_rowid(),
    person_id,
    taken_on: input.taken_on,
    bucket: input.bucket,
    hash: input.hash,
  };
  tracing::info!(ft_id = photo.id, pes_id = person_id, "photo added");
  Ok(photo)
}

pub fn list_photos(conn: &Connection, person_id: i64) -> Result<Vec<Photo>> {
  Guard(conn).require(Entity::Person, person_id)?;
  let mut stmt = conn.prepare(&format!(
    "SELECT {PHOTO_COLUMNS} FROM fotos_pessoas WHERE pes_id = ?1 ORDER BY ft_data DESC, ft_id"
  ))?;
  let rows = stmt
    .query_map([person_id], encode::photo)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}
