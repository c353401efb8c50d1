use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(10 * 60))
        .max_lifetime(Duration::from_secs(60 * 60))
        .connect(database_url)
        .await
}

/// Tables in dependency order. Every statement is idempotent.
const SCHEMA: &[&str] = &[
    // Organisation
    r#"
    CREATE TABLE IF NOT EXISTS opd (
        id UUID PRIMARY KEY,
        kode_opd VARCHAR(100) NOT NULL UNIQUE,
        nama_opd VARCHAR(255) NOT NULL,
        singkatan VARCHAR(100) NOT NULL DEFAULT '',
        alamat TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS jabatan (
        id VARCHAR(50) PRIMARY KEY,
        kode_jabatan VARCHAR(100) NOT NULL DEFAULT '',
        nama_jabatan VARCHAR(255) NOT NULL,
        kode_opd VARCHAR(100) NOT NULL REFERENCES opd(kode_opd) ON UPDATE CASCADE ON DELETE CASCADE,
        kelas_jabatan VARCHAR(50) NOT NULL DEFAULT '',
        jenis_jabatan VARCHAR(100) NOT NULL DEFAULT '',
        nilai_jabatan INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pegawai (
        id VARCHAR(50) PRIMARY KEY,
        nama_pegawai VARCHAR(255) NOT NULL,
        nip VARCHAR(50) NOT NULL UNIQUE,
        kode_opd VARCHAR(100) NOT NULL REFERENCES opd(kode_opd) ON UPDATE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS jabatan_pegawai (
        id SERIAL PRIMARY KEY,
        nip VARCHAR(50) NOT NULL REFERENCES pegawai(nip) ON UPDATE CASCADE ON DELETE CASCADE,
        id_jabatan VARCHAR(50) NOT NULL REFERENCES jabatan(id) ON DELETE CASCADE,
        bulan INTEGER NOT NULL,
        tahun INTEGER NOT NULL,
        kode_opd VARCHAR(100) NOT NULL REFERENCES opd(kode_opd) ON UPDATE CASCADE,
        UNIQUE (nip, id_jabatan, bulan, tahun)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS periode (
        id SERIAL PRIMARY KEY,
        tahun_awal VARCHAR(4) NOT NULL,
        tahun_akhir VARCHAR(4) NOT NULL,
        jenis_periode VARCHAR(50) NOT NULL DEFAULT ''
    )
    "#,
    // Performance tree
    r#"
    CREATE TABLE IF NOT EXISTS pohon_kinerja (
        id SERIAL PRIMARY KEY,
        parent INTEGER NOT NULL DEFAULT 0,
        nama_pohon TEXT NOT NULL,
        kode_opd VARCHAR(100) NOT NULL DEFAULT '',
        keterangan TEXT NOT NULL DEFAULT '',
        tahun VARCHAR(4) NOT NULL,
        jenis_pohon VARCHAR(50) NOT NULL DEFAULT '',
        level_pohon INTEGER NOT NULL,
        status VARCHAR(50) NOT NULL DEFAULT '',
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        clone_from INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_pohon_kinerja_opd_tahun ON pohon_kinerja(kode_opd, tahun)",
    "CREATE INDEX IF NOT EXISTS idx_pohon_kinerja_parent ON pohon_kinerja(parent)",
    r#"
    CREATE TABLE IF NOT EXISTS pelaksana_pokin (
        id VARCHAR(50) PRIMARY KEY,
        pohon_kinerja_id INTEGER NOT NULL REFERENCES pohon_kinerja(id) ON DELETE CASCADE,
        pegawai_id VARCHAR(50) NOT NULL REFERENCES pegawai(id) ON DELETE CASCADE
    )
    "#,
    // Budget codes
    r#"
    CREATE TABLE IF NOT EXISTS program (
        id VARCHAR(50) PRIMARY KEY,
        kode_program VARCHAR(50) NOT NULL UNIQUE,
        nama_program TEXT NOT NULL,
        kode_opd VARCHAR(100) NOT NULL DEFAULT '',
        tahun VARCHAR(4) NOT NULL DEFAULT '',
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS kegiatan (
        id VARCHAR(50) PRIMARY KEY,
        kode_kegiatan VARCHAR(50) NOT NULL UNIQUE,
        nama_kegiatan TEXT NOT NULL,
        kode_opd VARCHAR(100) NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sub_kegiatan (
        id VARCHAR(50) PRIMARY KEY,
        kode_subkegiatan VARCHAR(50) NOT NULL UNIQUE,
        nama_subkegiatan TEXT NOT NULL,
        status VARCHAR(50) NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pagu_sub_kegiatan (
        id VARCHAR(50) PRIMARY KEY,
        sub_kegiatan_id VARCHAR(50) NOT NULL REFERENCES sub_kegiatan(id) ON DELETE CASCADE,
        jenis_pagu VARCHAR(50) NOT NULL DEFAULT '',
        pagu_anggaran BIGINT NOT NULL DEFAULT 0,
        tahun VARCHAR(4) NOT NULL DEFAULT ''
    )
    "#,
    // Plans
    r#"
    CREATE TABLE IF NOT EXISTS rencana_kinerja (
        id VARCHAR(50) PRIMARY KEY,
        id_pohon INTEGER NOT NULL,
        nama_rencana_kinerja TEXT NOT NULL,
        tahun VARCHAR(4) NOT NULL,
        status_rencana_kinerja VARCHAR(50) NOT NULL,
        catatan TEXT NOT NULL DEFAULT '',
        kode_opd VARCHAR(100) NOT NULL,
        pegawai_id VARCHAR(50) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_rencana_kinerja_pohon ON rencana_kinerja(id_pohon)",
    "CREATE INDEX IF NOT EXISTS idx_rencana_kinerja_pegawai ON rencana_kinerja(pegawai_id, tahun)",
    r#"
    CREATE TABLE IF NOT EXISTS rekin_sub_kegiatan (
        id VARCHAR(50) PRIMARY KEY,
        rekin_id VARCHAR(50) NOT NULL REFERENCES rencana_kinerja(id) ON DELETE CASCADE,
        kode_subkegiatan VARCHAR(50) NOT NULL
            REFERENCES sub_kegiatan(kode_subkegiatan) ON UPDATE CASCADE ON DELETE CASCADE,
        UNIQUE (rekin_id, kode_subkegiatan)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sub_kegiatan_opd (
        id SERIAL PRIMARY KEY,
        kode_subkegiatan VARCHAR(50) NOT NULL
            REFERENCES sub_kegiatan(kode_subkegiatan) ON UPDATE CASCADE ON DELETE CASCADE,
        kode_opd VARCHAR(100) NOT NULL REFERENCES opd(kode_opd) ON UPDATE CASCADE ON DELETE CASCADE,
        tahun VARCHAR(4) NOT NULL,
        UNIQUE (kode_subkegiatan, kode_opd, tahun)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tujuan_opd (
        id SERIAL PRIMARY KEY,
        kode_opd VARCHAR(100) NOT NULL REFERENCES opd(kode_opd) ON UPDATE CASCADE ON DELETE CASCADE,
        kode_bidang_urusan VARCHAR(50) NOT NULL DEFAULT '',
        tujuan TEXT NOT NULL,
        periode_id INTEGER REFERENCES periode(id) ON DELETE SET NULL
    )
    "#,
    // Indicators: exactly one owner each
    r#"
    CREATE TABLE IF NOT EXISTS indikator (
        id VARCHAR(50) PRIMARY KEY,
        seq BIGSERIAL,
        indikator TEXT NOT NULL,
        tahun VARCHAR(4) NOT NULL DEFAULT '',
        kode VARCHAR(50) NOT NULL DEFAULT '',
        kode_opd VARCHAR(100) NOT NULL DEFAULT '',
        rumus_perhitungan TEXT NOT NULL DEFAULT '',
        sumber_data TEXT NOT NULL DEFAULT '',
        pagu_anggaran BIGINT NOT NULL DEFAULT 0,
        pokin_id INTEGER REFERENCES pohon_kinerja(id) ON DELETE CASCADE,
        rencana_kinerja_id VARCHAR(50) REFERENCES rencana_kinerja(id) ON DELETE CASCADE,
        program_id VARCHAR(50) REFERENCES program(id) ON DELETE CASCADE,
        kegiatan_id VARCHAR(50) REFERENCES kegiatan(id) ON DELETE CASCADE,
        sub_kegiatan_id VARCHAR(50) REFERENCES sub_kegiatan(id) ON DELETE CASCADE,
        tujuan_opd_id INTEGER REFERENCES tujuan_opd(id) ON DELETE CASCADE,
        CHECK (num_nonnulls(pokin_id, rencana_kinerja_id, program_id, kegiatan_id,
                            sub_kegiatan_id, tujuan_opd_id) = 1)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_indikator_pokin ON indikator(pokin_id)",
    "CREATE INDEX IF NOT EXISTS idx_indikator_rekin ON indikator(rencana_kinerja_id)",
    r#"
    CREATE TABLE IF NOT EXISTS target (
        id VARCHAR(50) PRIMARY KEY,
        seq BIGSERIAL,
        indikator_id VARCHAR(50) NOT NULL REFERENCES indikator(id) ON DELETE CASCADE,
        target VARCHAR(255) NOT NULL DEFAULT '',
        satuan VARCHAR(255) NOT NULL DEFAULT '',
        tahun VARCHAR(4) NOT NULL DEFAULT ''
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_target_indikator ON target(indikator_id)",
    // Reformasi birokrasi master data
    r#"
    CREATE TABLE IF NOT EXISTS master_rb (
        id SERIAL PRIMARY KEY,
        jenis_rb VARCHAR(255) NOT NULL,
        kegiatan_utama TEXT NOT NULL,
        keterangan TEXT NOT NULL DEFAULT '',
        tahun_baseline INTEGER NOT NULL,
        tahun_next INTEGER NOT NULL,
        last_updated_by INTEGER NOT NULL DEFAULT 0,
        current_version INTEGER NOT NULL DEFAULT 1,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS indikator_rb (
        id VARCHAR(50) PRIMARY KEY,
        seq BIGSERIAL,
        id_rb INTEGER NOT NULL REFERENCES master_rb(id) ON DELETE CASCADE,
        indikator TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS target_rb (
        id VARCHAR(50) PRIMARY KEY,
        seq BIGSERIAL,
        id_indikator VARCHAR(50) NOT NULL REFERENCES indikator_rb(id) ON DELETE CASCADE,
        tahun_baseline INTEGER NOT NULL DEFAULT 0,
        target_baseline INTEGER NOT NULL DEFAULT 0,
        realisasi_baseline REAL NOT NULL DEFAULT 0,
        satuan_baseline VARCHAR(255) NOT NULL DEFAULT '',
        tahun_next INTEGER NOT NULL DEFAULT 0,
        target_next INTEGER NOT NULL DEFAULT 0,
        satuan_next VARCHAR(255) NOT NULL DEFAULT ''
    )
    "#,
];

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
