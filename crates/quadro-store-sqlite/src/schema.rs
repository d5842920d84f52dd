//! SQL schema for the Quadro SQLite store.
//!
//! Executed once when a connection is opened.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Dates are stored as `YYYY-MM-DD` text, which sorts and compares
/// correctly as a string.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS cidades (
    cid_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    cid_nome TEXT NOT NULL,
    cid_uf   TEXT NOT NULL CHECK (length(cid_uf) = 2)
);

CREATE TABLE IF NOT EXISTS pessoas (
    pes_id              INTEGER PRIMARY KEY AUTOINCREMENT,
    pes_nome            TEXT NOT NULL,
    pes_data_nascimento TEXT NOT NULL,
    pes_sexo            TEXT NOT NULL,
    pes_mae             TEXT NOT NULL,
    pes_pai             TEXT NOT NULL,
    pes_cpf             TEXT UNIQUE
);

CREATE TABLE IF NOT EXISTS enderecos (
    end_id              INTEGER PRIMARY KEY AUTOINCREMENT,
    cid_id              INTEGER NOT NULL REFERENCES cidades(cid_id),
    end_tipo_logradouro TEXT NOT NULL,
    end_logradouro      TEXT NOT NULL,
    end_numero          TEXT NOT NULL,
    end_complemento     TEXT,
    end_bairro          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS pessoas_enderecos (
    pes_id INTEGER NOT NULL REFERENCES pessoas(pes_id),
    end_id INTEGER NOT NULL REFERENCES enderecos(end_id),
    PRIMARY KEY (pes_id, end_id)
);

CREATE TABLE IF NOT EXISTS unidades (
    unid_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    unid_nome  TEXT NOT NULL,
    unid_sigla TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS unidades_enderecos (
    unid_id INTEGER NOT NULL REFERENCES unidades(unid_id),
    end_id  INTEGER NOT NULL REFERENCES enderecos(end_id),
    PRIMARY KEY (unid_id, end_id)
);

-- A posting with no removal date is active.
CREATE TABLE IF NOT EXISTS lotacoes (
    lot_id           INTEGER PRIMARY KEY AUTOINCREMENT,
    pes_id           INTEGER NOT NULL REFERENCES pessoas(pes_id),
    unid_id          INTEGER NOT NULL REFERENCES unidades(unid_id),
    lot_data_lotacao TEXT NOT NULL,
    lot_data_remocao TEXT,
    lot_portaria     TEXT NOT NULL,
    CHECK (lot_data_remocao IS NULL OR lot_data_remocao >= lot_data_lotacao)
);

CREATE INDEX IF NOT EXISTS lotacoes_pes_id  ON lotacoes (pes_id);
CREATE INDEX IF NOT EXISTS lotacoes_unid_id ON lotacoes (unid_id);

CREATE TABLE IF NOT EXISTS servidores_efetivos (
    pes_id       INTEGER PRIMARY KEY REFERENCES pessoas(pes_id),
    se_matricula TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS servidores_temporarios (
    pes_id           INTEGER PRIMARY KEY REFERENCES pessoas(pes_id),
    st_data_admissao TEXT NOT NULL,
    st_data_demissao TEXT,
    CHECK (st_data_demissao IS NULL OR st_data_demissao >= st_data_admissao)
);

-- Photo metadata only; the images live in an object bucket.
CREATE TABLE IF NOT EXISTS fotos_pessoas (
    ft_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    pes_id    INTEGER NOT NULL REFERENCES pessoas(pes_id),
    ft_data   TEXT NOT NULL,
    ft_bucket TEXT NOT NULL,
    ft_hash   TEXT NOT NULL UNIQUE
);
";
