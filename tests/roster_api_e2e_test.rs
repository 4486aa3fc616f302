// ==========================================
// 名册导入 API 端到端测试
// ==========================================
// 测试范围: 模板生成 → 填写 → 导入 → 落库 → 查询
// ==========================================

mod test_helpers;

use school_roster::api::ApiError;
use school_roster::{i18n, logging, PersonStatus, RosterImportApi, RosterKind};
use std::io::Write;
use test_helpers::{create_test_db, temp_dir, write_csv, TEACHER_ROSTER_CSV};

fn student_value(header: &str, n: usize) -> String {
    match header {
        "No" => n.to_string(),
        "Name" => format!("Student{} Chan", n),
        "Gender" => "F".to_string(),
        "Email" => format!("s{}@school.edu", n),
        "Class" => "9B".to_string(),
        "Subjects" => "\"Math, Khmer\"".to_string(),
        "Status" => "Graduated".to_string(),
        _ => String::new(),
    }
}

#[tokio::test]
async fn test_template_fill_and_import() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().unwrap();
    let dir = temp_dir();
    let api = RosterImportApi::new(db_path);

    let template_path = dir.path().join("student_template.csv");
    let headers = api
        .write_template(RosterKind::Student, &template_path)
        .await
        .unwrap();
    assert_eq!(headers[0], "No");
    assert!(headers.contains(&"Class".to_string()));
    assert!(!headers.contains(&"Department".to_string()));

    {
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&template_path)
            .unwrap();
        for n in 1..=2 {
            let line: Vec<String> = headers.iter().map(|h| student_value(h, n)).collect();
            writeln!(file, "{}", line.join(",")).unwrap();
        }
    }

    let response = api
        .import_roster_file(&template_path.to_string_lossy(), RosterKind::Student)
        .await
        .unwrap();
    assert_eq!(response.imported, 2);
    assert_eq!(response.skipped_sheets, 0);

    let students = api.list_roster(RosterKind::Student).unwrap();
    assert_eq!(students.len(), 2);
    let first = students[0].profile();
    assert_eq!(first.first_name, "Student1");
    assert_eq!(first.last_name, "Chan");
    assert_eq!(first.status, PersonStatus::Graduated);
    assert_eq!(students[0].group(), Some("9B"));
    assert_eq!(students[0].subjects(), &["Math", "Khmer"]);

    // 教师名册不受影响
    assert!(api.list_roster(RosterKind::Teacher).unwrap().is_empty());
}

#[tokio::test]
async fn test_batches_listed_in_import_order() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().unwrap();
    let dir = temp_dir();
    let api = RosterImportApi::new(db_path);

    let first = write_csv(dir.path(), "teachers.csv", TEACHER_ROSTER_CSV).unwrap();
    let second = write_csv(
        dir.path(),
        "new_hires.csv",
        &["Name,Email,Phone,Department", "Keo Rithy,rithy@s.edu,015,Science"],
    )
    .unwrap();

    let r1 = api
        .import_roster_file(&first.to_string_lossy(), RosterKind::Teacher)
        .await
        .unwrap();
    let r2 = api
        .import_roster_file(&second.to_string_lossy(), RosterKind::Teacher)
        .await
        .unwrap();
    assert_ne!(r1.batch_id, r2.batch_id);

    let teachers = api.list_roster(RosterKind::Teacher).unwrap();
    let names: Vec<String> = teachers.iter().map(|t| t.profile().display_name()).collect();
    assert_eq!(names, vec!["John Doe", "Sok Dara", "Madonna", "Keo Rithy"]);
    assert_eq!(teachers[3].group(), Some("Science"));

    let batch = api.get_batch(&r2.batch_id).unwrap();
    assert_eq!(batch.kind, RosterKind::Teacher);
    assert_eq!(batch.file_name.as_deref(), Some("new_hires.csv"));
    assert_eq!(batch.imported_rows, 1);
}

#[tokio::test]
async fn test_failed_import_leaves_store_unchanged() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().unwrap();
    let dir = temp_dir();
    let api = RosterImportApi::new(db_path);

    let good = write_csv(dir.path(), "teachers.csv", TEACHER_ROSTER_CSV).unwrap();
    api.import_roster_file(&good.to_string_lossy(), RosterKind::Teacher)
        .await
        .unwrap();

    let title_only = write_csv(
        dir.path(),
        "cover.csv",
        &["Sunrise High School", "Teacher List 2024", ""],
    )
    .unwrap();
    let err = api
        .import_roster_file(&title_only.to_string_lossy(), RosterKind::Teacher)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::EmptyImport(_)));

    let missing = dir.path().join("missing.xlsx");
    let err = api
        .import_roster_file(&missing.to_string_lossy(), RosterKind::Teacher)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    assert_eq!(api.list_roster(RosterKind::Teacher).unwrap().len(), 3);
}

#[tokio::test]
async fn test_empty_import_message_is_localized() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().unwrap();
    let dir = temp_dir();
    let api = RosterImportApi::new(db_path);
    let header_only = write_csv(dir.path(), "students.csv", &["Name,Email,Phone"]).unwrap();

    i18n::set_locale("zh-CN");
    let err = api
        .import_roster_file(&header_only.to_string_lossy(), RosterKind::Student)
        .await
        .unwrap_err();
    i18n::set_locale("en");

    assert_eq!(err.to_string(), "未找到任何学生数据行，请检查列标题。");
}
