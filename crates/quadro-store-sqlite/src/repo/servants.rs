//! Servant records and the onboarding workflow.
//!
//! Onboarding writes up to four rows (person, address, person-address link,
//! servant) and must run on a transaction: any error returned from here
//! leaves the caller's transaction uncommitted.

use rusqlite::{Connection, OptionalExtension as _, Row, params};

use quadro_core::{
  Entity, ValidationErrors,
  address::{Address, NewAddress},
  dependency::DependencyChecker as _,
  page::{Page, PageRequest},
  person::Person,
  servant::{
    PermanentOnboarded, PermanentOnboarding, PermanentServant, PermanentServantDetail,
    PermanentServantPatch, ServantKind, ServantSubject, SubjectFields, TemporaryOnboarded,
    TemporaryOnboarding, TemporaryServant, TemporaryServantDetail, TemporaryServantPatch,
  },
};

use super::{is_taken, paginate, people, places};
use crate::{
  Result,
  encode::{self, encode_date, encode_opt_date},
  guard::{Guard, invalid},
};

const PERMANENT_FROM: &str = "servidores_efetivos JOIN pessoas USING (pes_id)";
const PERMANENT_COLUMNS: &str =
  "pes_id, se_matricula, pes_nome, pes_data_nascimento, pes_sexo, pes_mae, pes_pai, pes_cpf";

const TEMPORARY_FROM: &str = "servidores_temporarios JOIN pessoas USING (pes_id)";
const TEMPORARY_COLUMNS: &str = "pes_id, st_data_admissao, st_data_demissao, \
                                 pes_nome, pes_data_nascimento, pes_sexo, pes_mae, pes_pai, \
                                 pes_cpf";

fn permanent_detail(row: &Row<'_>) -> rusqlite::Result<PermanentServantDetail> {
  Ok(PermanentServantDetail { servant: encode::permanent(row)?, person: encode::person(row)? })
}

fn temporary_detail(row: &Row<'_>) -> rusqlite::Result<TemporaryServantDetail> {
  Ok(TemporaryServantDetail { servant: encode::temporary(row)?, person: encode::person(row)? })
}

// ─── Invariants ──────────────────────────────────────────────────────────────

fn has_active_temporary(conn: &Connection, person_id: i64) -> Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM servidores_temporarios WHERE pes_id = ?1 AND st_data_demissao IS NULL",
        [person_id],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

/// The cross-kind rule: permanent excludes an active temporary record;
/// temporary excludes any permanent record.
fn ensure_kind_allowed(conn: &Connection, kind: ServantKind, person_id: i64) -> Result<()> {
  let blocked = match kind {
    ServantKind::Permanent => has_active_temporary(conn, person_id)?,
    ServantKind::Temporary => Guard(conn).exists(Entity::PermanentServant, person_id)?,
  };
  if blocked {
    let (held, wanted) = match kind {
      ServantKind::Permanent => ("an active temporary", "permanent"),
      ServantKind::Temporary => ("a permanent", "temporary"),
    };
    return Err(
      quadro_core::Error::conflict(format!(
        "person {person_id} holds {held} servant record and cannot become a {wanted} servant"
      ))
      .into(),
    );
  }
  Ok(())
}

// ─── Onboarding ──────────────────────────────────────────────────────────────

/// Field-level checks that need the database, collected into `errors`.
fn check_subject(
  conn: &Connection,
  kind: ServantKind,
  subject: &ServantSubject,
  city_id: i64,
  errors: &mut ValidationErrors,
) -> Result<()> {
  let guard = Guard(conn);
  match subject {
    ServantSubject::Existing(id) => {
      if !guard.exists(Entity::Person, *id)? {
        errors.add("pes_id", "the selected person does not exist");
      } else if guard.exists(kind.entity(), *id)? {
        errors.add("pes_id", format!("the person already holds a {} record", kind.entity()));
      }
    }
    ServantSubject::New(person) => {
      if people::cpf_taken(conn, person.cpf.as_deref(), None)? {
        errors.add("pes_cpf", people::CPF_TAKEN);
      }
    }
  }
  if !guard.exists(Entity::City, city_id)? {
    errors.add("cid_id", "the selected city does not exist");
  }
  Ok(())
}

/// Person, address and link: the part shared by both kinds. The servant row
/// is written by the caller.
fn onboard_subject(
  conn: &Connection,
  kind: ServantKind,
  subject: ServantSubject,
  address: NewAddress,
) -> Result<(Person, Address)> {
  let person = match subject {
    ServantSubject::Existing(id) => people::load_person(conn, id)?,
    ServantSubject::New(input) => people::create(conn, input)?,
  };
  let address = places::create_address(conn, address)?;
  conn.execute(
    "INSERT INTO pessoas_enderecos (pes_id, end_id) VALUES (?1, ?2)",
    [person.id, address.id],
  )?;
  ensure_kind_allowed(conn, kind, person.id)?;
  Ok((person, address))
}

fn resolve(
  conn: &Connection,
  kind: ServantKind,
  subject: &SubjectFields,
  city_id: i64,
  mut errors: ValidationErrors,
) -> Result<ServantSubject> {
  let subject = match subject.resolve() {
    Ok(subject) => subject,
    Err(e) => {
      errors.merge(e);
      return Err(quadro_core::Error::from(errors).into());
    }
  };
  check_subject(conn, kind, &subject, city_id, &mut errors)?;
  errors.into_result().map_err(quadro_core::Error::from)?;
  Ok(subject)
}

pub fn onboard_permanent(conn: &Connection, input: PermanentOnboarding) -> Result<PermanentOnboarded> {
  let kind = ServantKind::Permanent;
  let mut errors = ValidationErrors::new();
  if is_taken(conn, Entity::PermanentServant, "se_matricula", &input.registration, None)? {
    errors.add("se_matricula", "the registration has already been taken");
  }
  let subject = resolve(conn, kind, &input.subject, input.address.city_id, errors)?;

  let (person, address) = onboard_subject(conn, kind, subject, input.address)?;
  conn.execute(
    "INSERT INTO servidores_efetivos (pes_id, se_matricula) VALUES (?1, ?2)",
    params![person.id, input.registration],
  )?;
  let servant = PermanentServant { person_id: person.id, registration: input.registration };
  tracing::info!(pes_id = person.id, end_id = address.id, "permanent servant onboarded");
  Ok(PermanentOnboarded { person, address, servant })
}

pub fn onboard_temporary(conn: &Connection, input: TemporaryOnboarding) -> Result<TemporaryOnboarded> {
  let kind = ServantKind::Temporary;
  let subject = resolve(conn, kind, &input.subject, input.address.city_id, ValidationErrors::new())?;

  let (person, address) = onboard_subject(conn, kind, subject, input.address)?;
  conn.execute(
    "INSERT INTO servidores_temporarios (pes_id, st_data_admissao, st_data_demissao)
     VALUES (?1, ?2, ?3)",
    params![person.id, encode_date(input.admitted_on), encode_opt_date(input.dismissed_on)],
  )?;
  let servant = TemporaryServant {
    person_id:    person.id,
    admitted_on:  input.admitted_on,
    dismissed_on: input.dismissed_on,
  };
  tracing::info!(pes_id = person.id, end_id = address.id, "temporary servant onboarded");
  Ok(TemporaryOnboarded { person, address, servant })
}

// ─── Reads ───────────────────────────────────────────────────────────────────

pub fn get_permanent(conn: &Connection, person_id: i64) -> Result<Option<PermanentServantDetail>> {
  Ok(
    conn
      .query_row(
        &format!("SELECT {PERMANENT_COLUMNS} FROM {PERMANENT_FROM} WHERE pes_id = ?1"),
        [person_id],
        permanent_detail,
      )
      .optional()?,
  )
}

pub fn get_temporary(conn: &Connection, person_id: i64) -> Result<Option<TemporaryServantDetail>> {
  Ok(
    conn
      .query_row(
        &format!("SELECT {TEMPORARY_COLUMNS} FROM {TEMPORARY_FROM} WHERE pes_id = ?1"),
        [person_id],
        temporary_detail,
      )
      .optional()?,
  )
}

pub fn list_permanent(conn: &Connection, request: PageRequest) -> Result<Page<PermanentServantDetail>> {
  paginate(conn, PERMANENT_FROM, PERMANENT_COLUMNS, "pes_id", request, permanent_detail)
}

pub fn list_temporary(conn: &Connection, request: PageRequest) -> Result<Page<TemporaryServantDetail>> {
  paginate(conn, TEMPORARY_FROM, TEMPORARY_COLUMNS, "pes_id", request, temporary_detail)
}

// ─── Updates ─────────────────────────────────────────────────────────────────

pub fn update_permanent(
  conn: &Connection,
  person_id: i64,
  patch: PermanentServantPatch,
) -> Result<PermanentServantDetail> {
  let mut current = get_permanent(conn, person_id)?
    .ok_or_else(|| quadro_core::Error::not_found(Entity::PermanentServant, person_id))?;

  if let Some(registration) = patch.registration {
    if is_taken(conn, Entity::PermanentServant, "se_matricula", &registration, Some(person_id))? {
      return Err(invalid("se_matricula", "the registration has already been taken"));
    }
    conn.execute(
      "UPDATE servidores_efetivos SET se_matricula = ?1 WHERE pes_id = ?2",
      params![registration, person_id],
    )?;
    current.servant.registration = registration;
  }
  current.person = people::update(conn, person_id, patch.person)?;
  tracing::info!(pes_id = person_id, "permanent servant updated");
  Ok(current)
}

/// Dismissal is one-way: the stored record decides whether a new dismissal
/// date is accepted.
pub fn update_temporary(
  conn: &Connection,
  person_id: i64,
  patch: TemporaryServantPatch,
) -> Result<TemporaryServantDetail> {
  let mut current = get_temporary(conn, person_id)?
    .ok_or_else(|| quadro_core::Error::not_found(Entity::TemporaryServant, person_id))?;
  let was_active = current.servant.is_active();

  let person_patch = patch.apply(&mut current.servant)?;
  conn.execute(
    "UPDATE servidores_temporarios SET st_data_admissao = ?1, st_data_demissao = ?2
     WHERE pes_id = ?3",
    params![
      encode_date(current.servant.admitted_on),
      encode_opt_date(current.servant.dismissed_on),
      person_id,
    ],
  )?;
  current.person = people::update(conn, person_id, person_patch)?;
  if was_active && !current.servant.is_active() {
    tracing::info!(pes_id = person_id, status = ?current.servant.status(), "temporary servant dismissed");
  } else {
    tracing::info!(pes_id = person_id, "temporary servant updated");
  }
  Ok(current)
}
