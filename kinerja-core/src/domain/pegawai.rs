//! Employee and position domain types

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pegawai {
    pub id: String,
    pub nama_pegawai: String,
    pub nip: String,
    pub kode_opd: String,
    pub nama_opd: String,
    pub jabatan: Vec<JabatanPegawai>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Jabatan {
    pub id: String,
    pub kode_jabatan: String,
    pub nama_jabatan: String,
    pub kode_opd: String,
    pub kelas_jabatan: String,
    pub jenis_jabatan: String,
    pub nilai_jabatan: i32,
}

/// A position held by an employee for a given month
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JabatanPegawai {
    pub id: i32,
    pub nip: String,
    pub id_jabatan: String,
    pub nama_jabatan: String,
    pub bulan: i32,
    pub tahun: i32,
    pub kode_opd: String,
}
