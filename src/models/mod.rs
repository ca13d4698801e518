pub mod activity_log;
pub mod announcement;
pub mod attendance;
pub mod grade;
pub mod guru;
pub mod kelas;
pub mod ortu;
pub mod schedule;
pub mod siswa;
pub mod subject;
pub mod user;
