//! Harness test integrasi: Supabase tiruan (GoTrue + PostgREST secukupnya)
//! yang jalan sebagai server HTTP sungguhan di port acak, plus helper seed
//! data dan pembuat token. Semua state tiruan dipegang in-memory supaya test
//! bisa memeriksa baris tabel dan urutan request yang dikirim aplikasi.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use actix_web::http::Method;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use smp_be::AppState;
use smp_be::config::Settings;
use smp_be::models::user::JwtClaims;

pub const JWT_SECRET: &str = "rahasia-jwt-harness-yang-panjangnya-cukup";
pub const DEFAULT_PASSWORD: &str = "password123";

#[derive(Clone)]
pub struct FakeAuthUser {
    pub id: String,
    pub email: String,
    pub password: String,
}

/// Isi Supabase tiruan. `request_log` menyimpan "METODE path?query" per
/// request masuk supaya test bisa menguji urutan operasi (lookup sebelum
/// write, hapus auth sebelum hapus baris).
#[derive(Default)]
pub struct FakeState {
    pub tables: HashMap<String, Vec<Value>>,
    pub auth_users: Vec<FakeAuthUser>,
    pub request_log: Vec<String>,
    pub fail_insert_tables: HashSet<String>,
}

pub struct FakeSupabase {
    pub state: Arc<Mutex<FakeState>>,
    pub base_url: String,
}

impl FakeSupabase {
    pub async fn spawn() -> FakeSupabase {
        let state: Arc<Mutex<FakeState>> = Arc::new(Mutex::new(FakeState::default()));
        let data = web::Data::from(Arc::clone(&state));
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener supabase tiruan");
        let addr = listener.local_addr().expect("local addr");

        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/auth/v1/signup", web::post().to(gotrue_signup))
                .route("/auth/v1/token", web::post().to(gotrue_token))
                .route("/auth/v1/logout", web::post().to(gotrue_logout))
                .route("/auth/v1/admin/users", web::post().to(gotrue_admin_create))
                .route(
                    "/auth/v1/admin/users/{id}",
                    web::put().to(gotrue_admin_update),
                )
                .route(
                    "/auth/v1/admin/users/{id}",
                    web::delete().to(gotrue_admin_delete),
                )
                .service(
                    web::resource("/rest/v1/{table}")
                        .route(web::get().to(rest_get))
                        .route(web::method(Method::HEAD).to(rest_get))
                        .route(web::post().to(rest_post))
                        .route(web::patch().to(rest_patch))
                        .route(web::delete().to(rest_delete)),
                )
        })
        .listen(listener)
        .expect("listen supabase tiruan")
        .workers(1)
        .disable_signals()
        .run();
        actix_web::rt::spawn(server);

        FakeSupabase {
            state,
            base_url: format!("http://{}", addr),
        }
    }

    /// Daftarkan identitas auth; id yang dikembalikan dipakai juga sebagai
    /// id baris `users` supaya sama dengan perilaku Supabase.
    pub fn add_auth_user(&self, email: &str, password: &str) -> String {
        let id = Uuid::new_v4().to_string();
        self.state.lock().unwrap().auth_users.push(FakeAuthUser {
            id: id.clone(),
            email: email.to_string(),
            password: password.to_string(),
        });
        id
    }

    pub fn seed(&self, table: &str, row: Value) {
        self.state
            .lock()
            .unwrap()
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn auth_user(&self, email: &str) -> Option<FakeAuthUser> {
        self.state
            .lock()
            .unwrap()
            .auth_users
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    pub fn auth_user_count(&self) -> usize {
        self.state.lock().unwrap().auth_users.len()
    }

    pub fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().request_log.clone()
    }

    /// POST ke tabel ini akan dijawab 500, untuk menguji kompensasi saga.
    pub fn fail_inserts_on(&self, table: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_insert_tables
            .insert(table.to_string());
    }
}

/// Indeks entri log pertama yang diawali `prefix` ("GET /rest/v1/siswas").
pub fn index_of(log: &[String], prefix: &str) -> Option<usize> {
    log.iter().position(|line| line.starts_with(prefix))
}

// ---------------------------------------------------------------------------
// token & state aplikasi

pub fn token_with_exp(user_id: &str, email: &str, exp_offset_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = JwtClaims {
        sub: user_id.to_string(),
        aud: Some("authenticated".to_string()),
        exp: Some((now + exp_offset_secs).max(0) as u64),
        iat: Some(now as u64),
        role: Some("authenticated".to_string()),
        email: Some(email.to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("sign token test")
}

pub fn sign_token(user_id: &str, email: &str) -> String {
    token_with_exp(user_id, email, 3600)
}

pub fn bearer(user_id: &str, email: &str) -> (String, String) {
    (
        "Authorization".to_string(),
        format!("Bearer {}", sign_token(user_id, email)),
    )
}

pub fn test_settings(base_url: &str) -> Settings {
    Settings {
        supabase_url: base_url.to_string(),
        supabase_anon_key: "anon-key-test".to_string(),
        supabase_service_role_key: "service-role-key-test".to_string(),
        supabase_jwt_secret: JWT_SECRET.to_string(),
        bind_address: "127.0.0.1:0".to_string(),
        allowed_origins: vec!["http://localhost:3000".to_string()],
    }
}

pub fn app_state(fake: &FakeSupabase) -> web::Data<AppState> {
    web::Data::new(AppState::new(
        test_settings(&fake.base_url),
        reqwest::Client::new(),
    ))
}

// ---------------------------------------------------------------------------
// seed akun per role

pub struct Akun {
    pub user_id: String,
    pub profile_id: String,
    pub email: String,
}

pub fn seed_admin(fake: &FakeSupabase, email: &str) -> String {
    let id = fake.add_auth_user(email, DEFAULT_PASSWORD);
    fake.seed(
        "users",
        json!({ "id": id, "email": email, "role": "admin", "status": "active" }),
    );
    id
}

pub fn seed_guru(fake: &FakeSupabase, email: &str, nip: &str, status: &str) -> Akun {
    let user_id = fake.add_auth_user(email, DEFAULT_PASSWORD);
    let user_status = if status == "aktif" { "active" } else { "belum_lengkap" };
    fake.seed(
        "users",
        json!({ "id": user_id, "email": email, "role": "guru", "status": user_status }),
    );
    let profile_id = Uuid::new_v4().to_string();
    fake.seed(
        "gurus",
        json!({
            "id": profile_id,
            "user_id": user_id,
            "nip": nip,
            "first_name": "Budi",
            "last_name": "Santoso",
            "email": email,
            "status": status,
        }),
    );
    Akun {
        user_id,
        profile_id,
        email: email.to_string(),
    }
}

pub fn seed_siswa(
    fake: &FakeSupabase,
    email: &str,
    nisn: &str,
    class_id: Option<&str>,
    status: &str,
) -> Akun {
    let user_id = fake.add_auth_user(email, DEFAULT_PASSWORD);
    let user_status = if status == "aktif" { "active" } else { "belum_lengkap" };
    fake.seed(
        "users",
        json!({ "id": user_id, "email": email, "role": "siswa", "status": user_status }),
    );
    let profile_id = Uuid::new_v4().to_string();
    fake.seed(
        "siswas",
        json!({
            "id": profile_id,
            "user_id": user_id,
            "nisn": nisn,
            "first_name": "Siti",
            "last_name": "Rahma",
            "email": email,
            "class_id": class_id,
            "status": status,
        }),
    );
    Akun {
        user_id,
        profile_id,
        email: email.to_string(),
    }
}

pub fn seed_ortu(fake: &FakeSupabase, email: &str, siswa_id: &str) -> Akun {
    let user_id = fake.add_auth_user(email, DEFAULT_PASSWORD);
    fake.seed(
        "users",
        json!({ "id": user_id, "email": email, "role": "ortu", "status": "active" }),
    );
    let profile_id = Uuid::new_v4().to_string();
    fake.seed(
        "ortu",
        json!({
            "id": profile_id,
            "user_id": user_id,
            "siswa_id": siswa_id,
            "first_name": "Dewi",
            "last_name": "Lestari",
            "email": email,
        }),
    );
    Akun {
        user_id,
        profile_id,
        email: email.to_string(),
    }
}

pub fn seed_kelas(fake: &FakeSupabase, name: &str) -> String {
    let id = Uuid::new_v4().to_string();
    fake.seed("classes", json!({ "id": id, "name": name, "level": "7" }));
    id
}

pub fn seed_subject(fake: &FakeSupabase, name: &str, class_id: &str, guru_id: &str) -> String {
    let id = Uuid::new_v4().to_string();
    fake.seed(
        "subjects",
        json!({ "id": id, "name": name, "class_id": class_id, "guru_id": guru_id }),
    );
    id
}

pub fn seed_schedule(
    fake: &FakeSupabase,
    class_id: &str,
    subject_id: &str,
    guru_id: &str,
    day_of_week: u8,
    start: &str,
    end: &str,
) -> String {
    let id = Uuid::new_v4().to_string();
    fake.seed(
        "schedules",
        json!({
            "id": id,
            "class_id": class_id,
            "subject_id": subject_id,
            "guru_id": guru_id,
            "day_of_week": day_of_week,
            "start_time": start,
            "end_time": end,
        }),
    );
    id
}

// ---------------------------------------------------------------------------
// endpoint GoTrue tiruan

fn note(st: &mut FakeState, req: &HttpRequest) {
    let mut line = format!("{} {}", req.method(), req.path());
    if !req.query_string().is_empty() {
        line.push('?');
        line.push_str(req.query_string());
    }
    st.request_log.push(line);
}

fn body_str(body: &Value, key: &str) -> String {
    body.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

async fn gotrue_signup(
    req: HttpRequest,
    state: web::Data<Mutex<FakeState>>,
    body: web::Json<Value>,
) -> HttpResponse {
    let mut st = state.lock().unwrap();
    note(&mut st, &req);
    let email = body_str(&body, "email");
    let password = body_str(&body, "password");
    if st.auth_users.iter().any(|u| u.email == email) {
        return HttpResponse::BadRequest().json(json!({
            "error_code": "user_already_exists",
            "msg": "User already registered",
        }));
    }
    let id = Uuid::new_v4().to_string();
    st.auth_users.push(FakeAuthUser {
        id: id.clone(),
        email: email.clone(),
        password,
    });
    HttpResponse::Ok().json(json!({
        "id": id,
        "email": email,
        "user": { "id": id, "email": email },
    }))
}

async fn gotrue_token(
    req: HttpRequest,
    state: web::Data<Mutex<FakeState>>,
    body: web::Json<Value>,
) -> HttpResponse {
    let mut st = state.lock().unwrap();
    note(&mut st, &req);
    let email = body_str(&body, "email");
    let password = body_str(&body, "password");
    let found = st
        .auth_users
        .iter()
        .find(|u| u.email == email && u.password == password)
        .cloned();
    match found {
        None => HttpResponse::BadRequest().json(json!({
            "error_code": "invalid_credentials",
            "msg": "Invalid login credentials",
        })),
        Some(user) => HttpResponse::Ok().json(json!({
            "access_token": sign_token(&user.id, &user.email),
            "refresh_token": format!("refresh-{}", user.id),
            "expires_in": 3600,
            "token_type": "bearer",
            "user": { "id": user.id, "email": user.email },
        })),
    }
}

async fn gotrue_logout(req: HttpRequest, state: web::Data<Mutex<FakeState>>) -> HttpResponse {
    let mut st = state.lock().unwrap();
    note(&mut st, &req);
    HttpResponse::NoContent().finish()
}

async fn gotrue_admin_create(
    req: HttpRequest,
    state: web::Data<Mutex<FakeState>>,
    body: web::Json<Value>,
) -> HttpResponse {
    let mut st = state.lock().unwrap();
    note(&mut st, &req);
    let email = body_str(&body, "email");
    let password = body_str(&body, "password");
    if st.auth_users.iter().any(|u| u.email == email) {
        return HttpResponse::UnprocessableEntity().json(json!({
            "error_code": "email_exists",
            "msg": "A user with this email address has already been registered",
        }));
    }
    let id = Uuid::new_v4().to_string();
    st.auth_users.push(FakeAuthUser {
        id: id.clone(),
        email: email.clone(),
        password,
    });
    HttpResponse::Ok().json(json!({ "id": id, "email": email }))
}

async fn gotrue_admin_update(
    req: HttpRequest,
    state: web::Data<Mutex<FakeState>>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> HttpResponse {
    let mut st = state.lock().unwrap();
    note(&mut st, &req);
    let id = path.into_inner();
    let password = body_str(&body, "password");
    match st.auth_users.iter_mut().find(|u| u.id == id) {
        None => HttpResponse::NotFound().json(json!({
            "error_code": "user_not_found",
            "msg": "User not found",
        })),
        Some(user) => {
            if !password.is_empty() {
                user.password = password;
            }
            HttpResponse::Ok().json(json!({ "id": id }))
        }
    }
}

async fn gotrue_admin_delete(
    req: HttpRequest,
    state: web::Data<Mutex<FakeState>>,
    path: web::Path<String>,
) -> HttpResponse {
    let mut st = state.lock().unwrap();
    note(&mut st, &req);
    let id = path.into_inner();
    let before = st.auth_users.len();
    st.auth_users.retain(|u| u.id != id);
    if st.auth_users.len() == before {
        return HttpResponse::NotFound().json(json!({
            "error_code": "user_not_found",
            "msg": "User not found",
        }));
    }
    HttpResponse::Ok().json(json!({}))
}

// ---------------------------------------------------------------------------
// engine PostgREST tiruan: filter eq/gte/lte/in/or, select dengan embed,
// order, limit, Prefer count=exact

fn query_pairs(req: &HttpRequest) -> Vec<(String, String)> {
    web::Query::<Vec<(String, String)>>::from_query(req.query_string())
        .map(|q| q.into_inner())
        .unwrap_or_default()
}

fn scalar_str(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cmp_scalar(field: &Value, want: &str) -> std::cmp::Ordering {
    if let (Some(a), Ok(b)) = (field.as_f64(), want.parse::<f64>()) {
        return a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal);
    }
    scalar_str(field).as_str().cmp(want)
}

fn cond_matches(row: &Value, col: &str, op: &str, want: &str) -> bool {
    let field = row.get(col).cloned().unwrap_or(Value::Null);
    match op {
        "eq" => scalar_str(&field) == want,
        "gte" => cmp_scalar(&field, want) != std::cmp::Ordering::Less,
        "lte" => cmp_scalar(&field, want) != std::cmp::Ordering::Greater,
        "in" => {
            let inner = want.trim_start_matches('(').trim_end_matches(')');
            inner
                .split(',')
                .filter(|item| !item.is_empty())
                .any(|item| scalar_str(&field) == item.trim())
        }
        // containment array: target_roles.cs.{guru}
        "cs" => {
            let wanted = want.trim_start_matches('{').trim_end_matches('}');
            match &field {
                Value::Array(items) => wanted
                    .split(',')
                    .filter(|w| !w.is_empty())
                    .all(|w| items.iter().any(|i| scalar_str(i) == w.trim())),
                _ => false,
            }
        }
        "is" => match want {
            "null" => field.is_null(),
            "true" => field == Value::Bool(true),
            "false" => field == Value::Bool(false),
            _ => false,
        },
        _ => false,
    }
}

fn row_matches(row: &Value, params: &[(String, String)]) -> bool {
    for (key, value) in params {
        if matches!(key.as_str(), "select" | "order" | "limit" | "offset") {
            continue;
        }
        let ok = if key == "or" {
            let inner = value
                .strip_prefix('(')
                .and_then(|v| v.strip_suffix(')'))
                .unwrap_or(value);
            split_top_level(inner).iter().any(|cond| {
                let mut parts = cond.splitn(3, '.');
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(col), Some(op), Some(want)) => cond_matches(row, col, op, want),
                    _ => false,
                }
            })
        } else {
            match value.split_once('.') {
                Some((op, want)) => cond_matches(row, key, op, want),
                None => false,
            }
        };
        if !ok {
            return false;
        }
    }
    true
}

fn apply_order(rows: &mut [Value], params: &[(String, String)]) {
    let orders: Vec<(&str, bool)> = params
        .iter()
        .filter(|(k, _)| k == "order")
        .map(|(_, v)| {
            let (col, dir) = v.split_once('.').unwrap_or((v.as_str(), "asc"));
            (col, dir == "desc")
        })
        .collect();
    if orders.is_empty() {
        return;
    }
    rows.sort_by(|a, b| {
        for (col, desc) in &orders {
            let av = a.get(*col).cloned().unwrap_or(Value::Null);
            let bv = b.get(*col).cloned().unwrap_or(Value::Null);
            let mut ord = if let (Some(x), Some(y)) = (av.as_f64(), bv.as_f64()) {
                x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal)
            } else {
                scalar_str(&av).cmp(&scalar_str(&bv))
            };
            if *desc {
                ord = ord.reverse();
            }
            if ord != std::cmp::Ordering::Equal {
                return ord;
            }
        }
        std::cmp::Ordering::Equal
    });
}

fn split_top_level(expr: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0;
    let mut cur = String::new();
    for ch in expr.chars() {
        match ch {
            '(' => {
                depth += 1;
                cur.push(ch);
            }
            ')' => {
                depth -= 1;
                cur.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(cur.clone());
                cur.clear();
            }
            _ => cur.push(ch),
        }
    }
    if !cur.is_empty() {
        parts.push(cur);
    }
    parts
}

/// Nama relasi di select bisa nama tabel ("classes") atau kolom FK
/// ("user_id"); dua-duanya dipetakan ke (kolom FK, tabel target).
fn resolve_relation(name: &str) -> (String, String) {
    match name {
        "classes" | "class_id" => ("class_id".to_string(), "classes".to_string()),
        "subjects" | "subject_id" => ("subject_id".to_string(), "subjects".to_string()),
        "gurus" | "guru_id" => ("guru_id".to_string(), "gurus".to_string()),
        "siswas" | "siswa_id" => ("siswa_id".to_string(), "siswas".to_string()),
        "users" | "user_id" => ("user_id".to_string(), "users".to_string()),
        other => (format!("{}_id", other), other.to_string()),
    }
}

fn project(row: &Value, select: &str, tables: &HashMap<String, Vec<Value>>) -> Value {
    let mut out = Map::new();
    for part in split_top_level(select) {
        let part = part.trim();
        if part == "*" {
            if let Some(obj) = row.as_object() {
                for (k, v) in obj {
                    out.insert(k.clone(), v.clone());
                }
            }
        } else if let Some(open) = part.find('(') {
            let head = &part[..open];
            let inner = &part[open + 1..part.len() - 1];
            let (alias, relation) = match head.split_once(':') {
                Some((a, rel)) => (a, rel),
                None => (head, head),
            };
            let (fk_col, target) = resolve_relation(relation);
            let embedded = row
                .get(&fk_col)
                .filter(|v| !v.is_null())
                .and_then(|fk| {
                    tables.get(&target).and_then(|rows| {
                        rows.iter()
                            .find(|r| r.get("id").map(scalar_str) == Some(scalar_str(fk)))
                    })
                })
                .map(|r| project(r, inner, tables));
            out.insert(alias.to_string(), embedded.unwrap_or(Value::Null));
        } else {
            out.insert(
                part.to_string(),
                row.get(part).cloned().unwrap_or(Value::Null),
            );
        }
    }
    Value::Object(out)
}

async fn rest_get(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<Mutex<FakeState>>,
) -> HttpResponse {
    let table = path.into_inner();
    let mut st = state.lock().unwrap();
    note(&mut st, &req);
    let params = query_pairs(&req);

    let mut rows: Vec<Value> = st
        .tables
        .get(&table)
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter(|row| row_matches(row, &params))
        .collect();
    apply_order(&mut rows, &params);
    let total = rows.len();
    if let Some(limit) = params
        .iter()
        .find(|(k, _)| k == "limit")
        .and_then(|(_, v)| v.parse::<usize>().ok())
    {
        rows.truncate(limit);
    }

    let select = params
        .iter()
        .find(|(k, _)| k == "select")
        .map(|(_, v)| v.clone())
        .unwrap_or_else(|| "*".to_string());
    let body: Vec<Value> = rows
        .iter()
        .map(|row| project(row, &select, &st.tables))
        .collect();

    let prefer = req
        .headers()
        .get("prefer")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let mut resp = HttpResponse::Ok();
    if prefer.contains("count=exact") {
        resp.insert_header((
            "Content-Range",
            format!("0-{}/{}", total.saturating_sub(1), total),
        ));
    }
    resp.json(body)
}

async fn rest_post(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<Mutex<FakeState>>,
    body: web::Json<Value>,
) -> HttpResponse {
    let table = path.into_inner();
    let mut st = state.lock().unwrap();
    note(&mut st, &req);
    if st.fail_insert_tables.contains(&table) {
        return HttpResponse::InternalServerError()
            .json(json!({ "message": "insert dipaksa gagal oleh test" }));
    }
    let incoming = match body.into_inner() {
        Value::Array(items) => items,
        single => vec![single],
    };
    let mut inserted = Vec::with_capacity(incoming.len());
    for mut row in incoming {
        if let Some(obj) = row.as_object_mut() {
            obj.entry("id")
                .or_insert_with(|| json!(Uuid::new_v4().to_string()));
            obj.entry("created_at")
                .or_insert_with(|| json!(Utc::now().to_rfc3339()));
        }
        inserted.push(row.clone());
        st.tables.entry(table.clone()).or_default().push(row);
    }
    HttpResponse::Created().json(inserted)
}

async fn rest_patch(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<Mutex<FakeState>>,
    body: web::Json<Value>,
) -> HttpResponse {
    let table = path.into_inner();
    let mut st = state.lock().unwrap();
    note(&mut st, &req);
    let params = query_pairs(&req);
    let patch = body.into_inner();
    let mut updated = Vec::new();
    if let Some(rows) = st.tables.get_mut(&table) {
        for row in rows.iter_mut() {
            if !row_matches(row, &params) {
                continue;
            }
            if let (Some(obj), Some(changes)) = (row.as_object_mut(), patch.as_object()) {
                for (k, v) in changes {
                    obj.insert(k.clone(), v.clone());
                }
            }
            updated.push(row.clone());
        }
    }
    HttpResponse::Ok().json(updated)
}

async fn rest_delete(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<Mutex<FakeState>>,
) -> HttpResponse {
    let table = path.into_inner();
    let mut st = state.lock().unwrap();
    note(&mut st, &req);
    let params = query_pairs(&req);
    let mut removed = Vec::new();
    if let Some(rows) = st.tables.get_mut(&table) {
        let mut kept = Vec::with_capacity(rows.len());
        for row in rows.drain(..) {
            if row_matches(&row, &params) {
                removed.push(row);
            } else {
                kept.push(row);
            }
        }
        *rows = kept;
    }
    HttpResponse::Ok().json(removed)
}
