//! Database seeder
//!
//! Loads the reference data bundled in `seed/data.json` (OPD, jabatan,
//! pegawai and periode). Rows that already exist are left untouched, so the
//! seeder can run against a live database any number of times.

use anyhow::Context;
use kinerja_core::domain::opd::Opd;
use kinerja_core::domain::pegawai::{Jabatan, Pegawai};
use kinerja_core::domain::tujuan_opd::Periode;
use kinerja_core::dto::opd::OpdCreateRequest;
use kinerja_core::dto::pegawai::{JabatanCreateRequest, PegawaiCreateRequest};
use kinerja_core::dto::tujuan_opd::PeriodeRequest;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::repository::{
    jabatan_repository, opd_repository, pegawai_repository, tujuan_opd_repository,
};

const SEED_DATA: &str = include_str!("seed/data.json");

#[derive(Debug, Deserialize)]
struct SeedData {
    #[serde(default)]
    opd: Vec<OpdCreateRequest>,
    #[serde(default)]
    jabatan: Vec<SeedJabatan>,
    #[serde(default)]
    pegawai: Vec<SeedPegawai>,
    #[serde(default)]
    periode: Vec<PeriodeRequest>,
}

/// Seeded rows carry fixed ids so reruns can recognise them
#[derive(Debug, Deserialize)]
struct SeedJabatan {
    id: String,
    #[serde(flatten)]
    jabatan: JabatanCreateRequest,
}

#[derive(Debug, Deserialize)]
struct SeedPegawai {
    id: String,
    #[serde(flatten)]
    pegawai: PegawaiCreateRequest,
}

/// Rows inserted by one run, per table
#[derive(Debug, Default, PartialEq)]
pub struct SeedSummary {
    pub opd: usize,
    pub jabatan: usize,
    pub pegawai: usize,
    pub periode: usize,
}

fn load_seed_data() -> anyhow::Result<SeedData> {
    serde_json::from_str(SEED_DATA).context("invalid bundled seed data")
}

/// Insert every missing seed row inside one transaction
pub async fn seed_all(pool: &PgPool) -> anyhow::Result<SeedSummary> {
    let data = load_seed_data()?;
    let mut summary = SeedSummary::default();

    let mut tx = pool.begin().await?;

    for req in data.opd {
        if opd_repository::exists(&mut tx, &req.kode_opd).await? {
            continue;
        }
        let opd = Opd {
            id: Uuid::new_v4(),
            kode_opd: req.kode_opd,
            nama_opd: req.nama_opd,
            singkatan: req.singkatan,
            alamat: req.alamat,
            created_at: chrono::Utc::now(),
        };
        opd_repository::create(&mut tx, &opd)
            .await
            .with_context(|| format!("seeding opd {}", opd.kode_opd))?;
        summary.opd += 1;
    }

    for seed in data.jabatan {
        if jabatan_repository::find_by_id(&mut tx, &seed.id).await?.is_some() {
            continue;
        }
        let req = seed.jabatan;
        let jabatan = Jabatan {
            id: seed.id,
            kode_jabatan: req.kode_jabatan,
            nama_jabatan: req.nama_jabatan,
            kode_opd: req.kode_opd,
            kelas_jabatan: req.kelas_jabatan,
            jenis_jabatan: req.jenis_jabatan,
            nilai_jabatan: req.nilai_jabatan,
        };
        jabatan_repository::create(&mut tx, &jabatan)
            .await
            .with_context(|| format!("seeding jabatan {}", jabatan.id))?;
        summary.jabatan += 1;
    }

    for seed in data.pegawai {
        if pegawai_repository::find_by_nip(&mut tx, &seed.pegawai.nip)
            .await?
            .is_some()
        {
            continue;
        }
        let req = seed.pegawai;
        let pegawai = Pegawai {
            id: seed.id,
            nama_pegawai: req.nama_pegawai,
            nip: req.nip,
            kode_opd: req.kode_opd,
            ..Default::default()
        };
        pegawai_repository::create(&mut tx, &pegawai)
            .await
            .with_context(|| format!("seeding pegawai {}", pegawai.nip))?;
        summary.pegawai += 1;
    }

    let existing = tujuan_opd_repository::find_all_periode(&mut tx).await?;
    for req in data.periode {
        let seeded = existing.iter().any(|p| {
            p.tahun_awal == req.tahun_awal
                && p.tahun_akhir == req.tahun_akhir
                && p.jenis_periode == req.jenis_periode
        });
        if seeded {
            continue;
        }
        let periode = Periode {
            id: 0,
            tahun_awal: req.tahun_awal,
            tahun_akhir: req.tahun_akhir,
            jenis_periode: req.jenis_periode,
        };
        tujuan_opd_repository::create_periode(&mut tx, &periode).await?;
        summary.periode += 1;
    }

    tx.commit().await?;

    tracing::info!(
        "Seeded {} opd, {} jabatan, {} pegawai, {} periode",
        summary.opd,
        summary.jabatan,
        summary.pegawai,
        summary.periode
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_seed_data_parses() {
        let data = load_seed_data().unwrap();
        assert!(!data.opd.is_empty());
        assert!(!data.periode.is_empty());
        assert_eq!(data.jabatan[0].id, "JBTN-SEED-0001");
        assert_eq!(data.jabatan[0].jabatan.nilai_jabatan, 2465);
    }

    #[test]
    fn test_seed_rows_reference_seeded_opd() {
        let data = load_seed_data().unwrap();
        let kode: Vec<&str> = data.opd.iter().map(|o| o.kode_opd.as_str()).collect();
        for j in &data.jabatan {
            assert!(kode.contains(&j.jabatan.kode_opd.as_str()), "{}", j.id);
        }
        for p in &data.pegawai {
            assert!(kode.contains(&p.pegawai.kode_opd.as_str()), "{}", p.id);
        }
    }
}
