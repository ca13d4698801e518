mod support;

use actix_web::{App, test};
use chrono::{Datelike, Duration, Local};
use serde_json::{Value, json};
use uuid::Uuid;

use support::{Akun, FakeSupabase, bearer, seed_guru, seed_kelas, seed_ortu, seed_siswa, seed_subject};

struct Fixture {
    fake: FakeSupabase,
    guru: Akun,
    kelas_id: String,
    subject_id: String,
    siswa1: Akun,
    siswa2: Akun,
}

async fn fixture() -> Fixture {
    let fake = FakeSupabase::spawn().await;
    let kelas_id = seed_kelas(&fake, "7A");
    let guru = seed_guru(&fake, "guru@smp.sch.id", "198703022008011003", "aktif");
    let subject_id = seed_subject(&fake, "Matematika", &kelas_id, &guru.profile_id);
    let siswa1 = seed_siswa(&fake, "siswa1@smp.sch.id", "0051234567", Some(&kelas_id), "aktif");
    let siswa2 = seed_siswa(&fake, "siswa2@smp.sch.id", "0059876543", Some(&kelas_id), "aktif");
    Fixture {
        fake,
        guru,
        kelas_id,
        subject_id,
        siswa1,
        siswa2,
    }
}

fn grades_body(fx: &Fixture, v1: f64, v2: f64) -> Value {
    json!({
        "subject_id": fx.subject_id,
        "type": "uts",
        "entries": [
            { "siswa_id": fx.siswa1.profile_id, "value": v1 },
            { "siswa_id": fx.siswa2.profile_id, "value": v2 },
        ],
    })
}

#[actix_web::test]
async fn saving_grades_twice_overwrites_instead_of_appending() {
    let fx = fixture().await;

    let app = test::init_service(
        App::new()
            .app_data(support::app_state(&fx.fake))
            .configure(smp_be::configure),
    )
    .await;

    for (v1, v2) in [(80.0, 90.0), (85.0, 95.0)] {
        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/guru/nilai")
                .insert_header(bearer(&fx.guru.user_id, &fx.guru.email))
                .set_json(grades_body(&fx, v1, v2))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Nilai berhasil disimpan");
    }

    let rows = fx.fake.rows("grades");
    assert_eq!(rows.len(), 2);
    for row in &rows {
        // nilai dicap identitas guru pengampu, bukan dari body request
        assert_eq!(row["guru_id"], fx.guru.profile_id.as_str());
        assert_eq!(row["type"], "uts");
        assert_eq!(row["max_value"], 100.0);
    }
    let nilai1 = rows
        .iter()
        .find(|r| r["siswa_id"] == fx.siswa1.profile_id.as_str())
        .expect("nilai siswa1");
    assert_eq!(nilai1["value"], 85.0);
}

#[actix_web::test]
async fn grade_values_outside_range_are_rejected() {
    let fx = fixture().await;

    let app = test::init_service(
        App::new()
            .app_data(support::app_state(&fx.fake))
            .configure(smp_be::configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/guru/nilai")
            .insert_header(bearer(&fx.guru.user_id, &fx.guru.email))
            .set_json(grades_body(&fx, 101.0, 90.0))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Nilai harus di antara 0 dan 100");
    assert!(fx.fake.rows("grades").is_empty());
}

#[actix_web::test]
async fn empty_grade_entries_are_rejected() {
    let fx = fixture().await;

    let app = test::init_service(
        App::new()
            .app_data(support::app_state(&fx.fake))
            .configure(smp_be::configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/guru/nilai")
            .insert_header(bearer(&fx.guru.user_id, &fx.guru.email))
            .set_json(json!({ "subject_id": fx.subject_id, "type": "uts", "entries": [] }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Tidak ada data nilai untuk disimpan");
}

#[actix_web::test]
async fn grade_sheet_lists_whole_class_with_existing_values() {
    let fx = fixture().await;
    fx.fake.seed(
        "grades",
        json!({
            "id": Uuid::new_v4().to_string(),
            "siswa_id": fx.siswa1.profile_id,
            "subject_id": fx.subject_id,
            "guru_id": fx.guru.profile_id,
            "type": "uts",
            "value": 75.0,
            "max_value": 100.0,
        }),
    );

    let app = test::init_service(
        App::new()
            .app_data(support::app_state(&fx.fake))
            .configure(smp_be::configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/guru/nilai?subject_id={}&type=uts", fx.subject_id))
            .insert_header(bearer(&fx.guru.user_id, &fx.guru.email))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    let rows = body["data"].as_array().expect("baris lembar");
    assert_eq!(rows.len(), 2);
    let row1 = rows
        .iter()
        .find(|r| r["siswa_id"] == fx.siswa1.profile_id.as_str())
        .unwrap();
    assert_eq!(row1["value"], 75.0);
    let row2 = rows
        .iter()
        .find(|r| r["siswa_id"] == fx.siswa2.profile_id.as_str())
        .unwrap();
    assert_eq!(row2["value"], Value::Null);
}

#[actix_web::test]
async fn teacher_cannot_grade_someone_elses_subject() {
    let fx = fixture().await;
    let guru_lain = seed_guru(&fx.fake, "guru2@smp.sch.id", "199001012015021001", "aktif");

    let app = test::init_service(
        App::new()
            .app_data(support::app_state(&fx.fake))
            .configure(smp_be::configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/guru/nilai")
            .insert_header(bearer(&guru_lain.user_id, &guru_lain.email))
            .set_json(grades_body(&fx, 80.0, 90.0))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 403);
    assert!(fx.fake.rows("grades").is_empty());

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/guru/nilai")
            .insert_header(bearer(&fx.guru.user_id, &fx.guru.email))
            .set_json(json!({
                "subject_id": Uuid::new_v4(),
                "type": "uts",
                "entries": [{ "siswa_id": fx.siswa1.profile_id, "value": 80.0 }],
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Mata pelajaran tidak ditemukan");
}

#[actix_web::test]
async fn resubmitted_attendance_only_replaces_sent_students() {
    let fx = fixture().await;

    let app = test::init_service(
        App::new()
            .app_data(support::app_state(&fx.fake))
            .configure(smp_be::configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/guru/absensi")
            .insert_header(bearer(&fx.guru.user_id, &fx.guru.email))
            .set_json(json!({
                "subject_id": fx.subject_id,
                "date": "2026-08-10",
                "entries": [
                    { "siswa_id": fx.siswa1.profile_id, "status": "hadir" },
                    { "siswa_id": fx.siswa2.profile_id, "status": "alpha" },
                ],
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Absensi berhasil disimpan");

    // koreksi satu siswa di tanggal yang sama
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/guru/absensi")
            .insert_header(bearer(&fx.guru.user_id, &fx.guru.email))
            .set_json(json!({
                "subject_id": fx.subject_id,
                "date": "2026-08-10",
                "entries": [{ "siswa_id": fx.siswa1.profile_id, "status": "sakit" }],
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!(
                "/guru/absensi?subject_id={}&date=2026-08-10",
                fx.subject_id
            ))
            .insert_header(bearer(&fx.guru.user_id, &fx.guru.email))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    let rows = body["data"].as_array().unwrap();
    let of = |akun: &Akun| {
        rows.iter()
            .find(|r| r["siswa_id"] == akun.profile_id.as_str())
            .cloned()
            .unwrap()
    };
    assert_eq!(of(&fx.siswa1)["status"], "sakit");
    assert_eq!(of(&fx.siswa2)["status"], "alpha");
    assert_eq!(fx.fake.rows("attendance").len(), 2);
}

#[actix_web::test]
async fn student_sees_own_grades_and_attendance_with_subject_names() {
    let fx = fixture().await;
    fx.fake.seed(
        "grades",
        json!({
            "id": Uuid::new_v4().to_string(),
            "siswa_id": fx.siswa1.profile_id,
            "subject_id": fx.subject_id,
            "guru_id": fx.guru.profile_id,
            "type": "tugas",
            "value": 88.0,
            "max_value": 100.0,
        }),
    );
    fx.fake.seed(
        "attendance",
        json!({
            "id": Uuid::new_v4().to_string(),
            "siswa_id": fx.siswa1.profile_id,
            "subject_id": fx.subject_id,
            "guru_id": fx.guru.profile_id,
            "date": "2026-08-10",
            "status": "hadir",
        }),
    );

    let app = test::init_service(
        App::new()
            .app_data(support::app_state(&fx.fake))
            .configure(smp_be::configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/siswa/nilai")
            .insert_header(bearer(&fx.siswa1.user_id, &fx.siswa1.email))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"][0]["value"], 88.0);
    assert_eq!(body["data"][0]["subjects"]["name"], "Matematika");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/siswa/absensi")
            .insert_header(bearer(&fx.siswa1.user_id, &fx.siswa1.email))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"][0]["status"], "hadir");
    assert_eq!(body["data"][0]["subjects"]["name"], "Matematika");

    // nilai siswa lain tidak ikut terbawa
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/siswa/nilai")
            .insert_header(bearer(&fx.siswa2.user_id, &fx.siswa2.email))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"], json!([]));
}

#[actix_web::test]
async fn student_dashboard_averages_grades_and_windows_attendance() {
    let fx = fixture().await;
    let today = Local::now().date_naive();
    for (value, kind) in [(80.0, "tugas"), (90.5, "uts")] {
        fx.fake.seed(
            "grades",
            json!({
                "id": Uuid::new_v4().to_string(),
                "siswa_id": fx.siswa1.profile_id,
                "subject_id": fx.subject_id,
                "guru_id": fx.guru.profile_id,
                "type": kind,
                "value": value,
                "max_value": 100.0,
            }),
        );
    }
    for (days_ago, status) in [(1i64, "hadir"), (2, "alpha"), (40, "hadir")] {
        fx.fake.seed(
            "attendance",
            json!({
                "id": Uuid::new_v4().to_string(),
                "siswa_id": fx.siswa1.profile_id,
                "subject_id": fx.subject_id,
                "guru_id": fx.guru.profile_id,
                "date": (today - Duration::days(days_ago)).to_string(),
                "status": status,
            }),
        );
    }
    let hari_ini = today.weekday().number_from_monday() as u8;
    support::seed_schedule(
        &fx.fake,
        &fx.kelas_id,
        &fx.subject_id,
        &fx.guru.profile_id,
        hari_ini,
        "07:00:00",
        "08:30:00",
    );

    let app = test::init_service(
        App::new()
            .app_data(support::app_state(&fx.fake))
            .configure(smp_be::configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/siswa/dashboard")
            .insert_header(bearer(&fx.siswa1.user_id, &fx.siswa1.email))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    let data = &body["data"];
    assert_eq!(data["rata_rata_nilai"], 85.25);
    // catatan 40 hari lalu di luar jendela 30 hari
    assert_eq!(data["kehadiran_30_hari"]["hadir"], 1);
    assert_eq!(data["kehadiran_30_hari"]["alpha"], 1);
    assert_eq!(data["kehadiran_30_hari"]["persentase_hadir"], 50.0);
    assert_eq!(data["total_mapel"], 1);
    assert_eq!(data["jadwal_hari_ini"].as_array().unwrap().len(), 1);
    assert_eq!(data["jadwal_hari_ini"][0]["subjects"]["name"], "Matematika");
}

#[actix_web::test]
async fn parent_dashboard_covers_full_attendance_history() {
    let fx = fixture().await;
    let ortu = seed_ortu(&fx.fake, "ortu@smp.sch.id", &fx.siswa1.profile_id);
    let today = Local::now().date_naive();
    for (days_ago, status) in [(1i64, "hadir"), (40, "izin")] {
        fx.fake.seed(
            "attendance",
            json!({
                "id": Uuid::new_v4().to_string(),
                "siswa_id": fx.siswa1.profile_id,
                "subject_id": fx.subject_id,
                "guru_id": fx.guru.profile_id,
                "date": (today - Duration::days(days_ago)).to_string(),
                "status": status,
            }),
        );
    }
    fx.fake.seed(
        "grades",
        json!({
            "id": Uuid::new_v4().to_string(),
            "siswa_id": fx.siswa1.profile_id,
            "subject_id": fx.subject_id,
            "guru_id": fx.guru.profile_id,
            "type": "uas",
            "value": 77.0,
            "max_value": 100.0,
        }),
    );

    let app = test::init_service(
        App::new()
            .app_data(support::app_state(&fx.fake))
            .configure(smp_be::configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/ortu/dashboard")
            .insert_header(bearer(&ortu.user_id, &ortu.email))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    let data = &body["data"];
    assert_eq!(data["siswa"]["id"], fx.siswa1.profile_id.as_str());
    assert_eq!(data["kelas"]["name"], "7A");
    assert_eq!(data["rata_rata_nilai"], 77.0);
    assert_eq!(data["total_mapel"], 1);
    // seluruh riwayat dihitung, termasuk yang lebih tua dari 30 hari
    assert_eq!(data["kehadiran"]["hadir"], 1);
    assert_eq!(data["kehadiran"]["izin"], 1);
    assert_eq!(data["kehadiran"]["persentase_hadir"], 50.0);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/ortu/nilai")
            .insert_header(bearer(&ortu.user_id, &ortu.email))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Nilai anak");
    assert_eq!(body["data"][0]["value"], 77.0);
}

#[actix_web::test]
async fn teacher_dashboard_summarizes_their_teaching_load() {
    let fx = fixture().await;
    let today = Local::now().date_naive();
    for (siswa, value) in [(&fx.siswa1, 80.0), (&fx.siswa2, 90.0)] {
        fx.fake.seed(
            "grades",
            json!({
                "id": Uuid::new_v4().to_string(),
                "siswa_id": siswa.profile_id,
                "subject_id": fx.subject_id,
                "guru_id": fx.guru.profile_id,
                "type": "uts",
                "value": value,
                "max_value": 100.0,
            }),
        );
    }
    fx.fake.seed(
        "attendance",
        json!({
            "id": Uuid::new_v4().to_string(),
            "siswa_id": fx.siswa1.profile_id,
            "subject_id": fx.subject_id,
            "guru_id": fx.guru.profile_id,
            "date": (today - Duration::days(3)).to_string(),
            "status": "hadir",
        }),
    );

    let app = test::init_service(
        App::new()
            .app_data(support::app_state(&fx.fake))
            .configure(smp_be::configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/guru/dashboard")
            .insert_header(bearer(&fx.guru.user_id, &fx.guru.email))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    let data = &body["data"];
    assert_eq!(data["total_kelas"], 1);
    assert_eq!(data["total_mapel"], 1);
    assert_eq!(data["total_siswa"], 2);
    assert_eq!(data["rata_rata_nilai"], 85.0);
    assert_eq!(
        data["absen_terakhir"],
        (today - Duration::days(3)).to_string().as_str()
    );
}

#[actix_web::test]
async fn teacher_class_roster_is_limited_to_their_classes() {
    let fx = fixture().await;
    let kelas_lain = seed_kelas(&fx.fake, "9C");

    let app = test::init_service(
        App::new()
            .app_data(support::app_state(&fx.fake))
            .configure(smp_be::configure),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/guru/kelas")
            .insert_header(bearer(&fx.guru.user_id, &fx.guru.email))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "7A");
    assert_eq!(body["data"][0]["jumlah_siswa"], 2);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/guru/kelas/{}/siswa", fx.kelas_id))
            .insert_header(bearer(&fx.guru.user_id, &fx.guru.email))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/guru/kelas/{}/siswa", kelas_lain))
            .insert_header(bearer(&fx.guru.user_id, &fx.guru.email))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), 403);
}
