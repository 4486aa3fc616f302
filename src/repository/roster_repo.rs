use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::person::{PersonProfile, RosterEntity, Student, Teacher};
use crate::domain::roster::RosterImportBatch;
use crate::domain::types::{PersonStatus, RosterKind};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// RosterRepository - 名册仓储
// ==========================================
/// 名册仓储
/// 职责: 管理 roster_import_batch / roster_person 表
/// 红线: 不含业务逻辑，只负责数据访问
pub struct RosterRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RosterRepository {
    /// 创建新的 RosterRepository 实例（首次打开时建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 保存一次导入（批次 + 全部人员）
    ///
    /// # 返回
    /// - Ok(usize): 写入的人员数
    /// - Err: 数据库错误（事务回滚，批次与人员均不落库）
    pub fn save_import(
        &self,
        batch: &RosterImportBatch,
        entities: &[RosterEntity],
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO roster_import_batch (
                batch_id, kind, file_name, file_path, sheet_count,
                imported_rows, skipped_sheets, imported_at, elapsed_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                batch.batch_id,
                batch.kind.as_str(),
                batch.file_name,
                batch.file_path,
                batch.sheet_count,
                batch.imported_rows,
                batch.skipped_sheets,
                batch.imported_at.to_rfc3339(),
                batch.elapsed_ms,
            ],
        )?;

        let mut count = 0;
        for (seq_no, entity) in entities.iter().enumerate() {
            let profile = entity.profile();
            let (department, class_name) = match entity {
                RosterEntity::Teacher(t) => (t.department.as_deref(), None),
                RosterEntity::Student(s) => (None, s.class_name.as_deref()),
            };
            let subjects_json = serde_json::to_string(entity.subjects())?;

            tx.execute(
                r#"
                INSERT INTO roster_person (
                    id, batch_id, seq_no, kind, first_name, last_name,
                    gender, date_of_birth, place_of_birth, phone, email,
                    current_address, status, avatar, department, class_name, subjects_json
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17
                )
                "#,
                params![
                    profile.id,
                    batch.batch_id,
                    seq_no as i64,
                    entity.kind().as_str(),
                    profile.first_name,
                    profile.last_name,
                    profile.gender,
                    profile.date_of_birth,
                    profile.place_of_birth,
                    profile.phone,
                    profile.email,
                    profile.current_address,
                    profile.status.as_str(),
                    profile.avatar,
                    department,
                    class_name,
                    subjects_json,
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 按名册种类查询人员（按导入顺序）
    pub fn list_by_kind(&self, kind: RosterKind) -> RepositoryResult<Vec<RosterEntity>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                p.id, p.first_name, p.last_name, p.gender, p.date_of_birth,
                p.place_of_birth, p.phone, p.email, p.current_address, p.status,
                p.avatar, p.department, p.class_name, p.subjects_json
            FROM roster_person p
            JOIN roster_import_batch b ON b.batch_id = p.batch_id
            WHERE p.kind = ?1
            ORDER BY b.rowid, p.seq_no
            "#,
        )?;

        let rows = stmt.query_map(params![kind.as_str()], |row| PersonRow::from_row(row))?;

        let mut entities = Vec::new();
        for row in rows {
            entities.push(row?.into_entity(kind)?);
        }
        Ok(entities)
    }

    /// 统计某种名册的人员数
    pub fn count_by_kind(&self, kind: RosterKind) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM roster_person WHERE kind = ?1",
            params![kind.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// 按 batch_id 查询导入批次
    pub fn find_batch(&self, batch_id: &str) -> RepositoryResult<Option<RosterImportBatch>> {
        let conn = self.get_conn()?;
        let raw = conn
            .query_row(
                r#"
                SELECT batch_id, kind, file_name, file_path, sheet_count,
                       imported_rows, skipped_sheets, imported_at, elapsed_ms
                FROM roster_import_batch
                WHERE batch_id = ?1
                "#,
                params![batch_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, i32>(4)?,
                        row.get::<_, i32>(5)?,
                        row.get::<_, i32>(6)?,
                        row.get::<_, String>(7)?,
                        row.get::<_, i64>(8)?,
                    ))
                },
            )
            .optional()?;

        let Some((
            batch_id,
            kind,
            file_name,
            file_path,
            sheet_count,
            imported_rows,
            skipped_sheets,
            imported_at,
            elapsed_ms,
        )) = raw
        else {
            return Ok(None);
        };

        let kind = kind
            .parse::<RosterKind>()
            .map_err(|message| RepositoryError::FieldValueError {
                field: "kind".to_string(),
                message,
            })?;
        let imported_at = DateTime::parse_from_rfc3339(&imported_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| RepositoryError::FieldValueError {
                field: "imported_at".to_string(),
                message: e.to_string(),
            })?;

        Ok(Some(RosterImportBatch {
            batch_id,
            kind,
            file_name,
            file_path,
            sheet_count,
            imported_rows,
            skipped_sheets,
            imported_at,
            elapsed_ms,
        }))
    }
}

// roster_person 行（反序列化中间态）
struct PersonRow {
    profile: PersonProfile,
    department: Option<String>,
    class_name: Option<String>,
    subjects_json: String,
}

impl PersonRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let status: String = row.get(9)?;
        Ok(Self {
            profile: PersonProfile {
                id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                gender: row.get(3)?,
                date_of_birth: row.get(4)?,
                place_of_birth: row.get(5)?,
                phone: row.get(6)?,
                email: row.get(7)?,
                current_address: row.get(8)?,
                status: match status.as_str() {
                    "graduated" => PersonStatus::Graduated,
                    "inactive" => PersonStatus::Inactive,
                    _ => PersonStatus::Active,
                },
                avatar: row.get(10)?,
            },
            department: row.get(11)?,
            class_name: row.get(12)?,
            subjects_json: row.get(13)?,
        })
    }

    fn into_entity(self, kind: RosterKind) -> RepositoryResult<RosterEntity> {
        let subjects: Vec<String> = serde_json::from_str(&self.subjects_json)?;
        Ok(match kind {
            RosterKind::Teacher => RosterEntity::Teacher(Teacher {
                profile: self.profile,
                department: self.department,
                subjects,
            }),
            RosterKind::Student => RosterEntity::Student(Student {
                profile: self.profile,
                class_name: self.class_name,
                subjects,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_repo() -> RosterRepository {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        RosterRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn teacher(id: &str, first: &str) -> RosterEntity {
        RosterEntity::Teacher(Teacher {
            profile: PersonProfile {
                id: id.to_string(),
                first_name: first.to_string(),
                last_name: "Doe".to_string(),
                gender: Some("M".to_string()),
                date_of_birth: None,
                place_of_birth: None,
                phone: Some("012".to_string()),
                email: None,
                current_address: None,
                status: PersonStatus::Graduated,
                avatar: None,
            },
            department: Some("Science".to_string()),
            subjects: vec!["Physics".to_string(), "Math".to_string()],
        })
    }

    fn batch(batch_id: &str, rows: i32) -> RosterImportBatch {
        RosterImportBatch {
            batch_id: batch_id.to_string(),
            kind: RosterKind::Teacher,
            file_name: Some("teachers.xlsx".to_string()),
            file_path: None,
            sheet_count: 1,
            imported_rows: rows,
            skipped_sheets: 0,
            imported_at: Utc::now(),
            elapsed_ms: 12,
        }
    }

    #[test]
    fn test_save_and_list_round_trip() {
        let repo = setup_repo();
        let entities = vec![teacher("t-1", "John"), teacher("t-2", "Jane")];

        let saved = repo.save_import(&batch("b-1", 2), &entities).unwrap();
        assert_eq!(saved, 2);

        let listed = repo.list_by_kind(RosterKind::Teacher).unwrap();
        assert_eq!(listed, entities);
        assert!(repo.list_by_kind(RosterKind::Student).unwrap().is_empty());
        assert_eq!(repo.count_by_kind(RosterKind::Teacher).unwrap(), 2);
    }

    #[test]
    fn test_list_preserves_batch_order() {
        let repo = setup_repo();
        repo.save_import(&batch("b-2", 1), &[teacher("t-9", "Second")])
            .unwrap();
        repo.save_import(&batch("b-1", 1), &[teacher("t-1", "Third")])
            .unwrap();

        let names: Vec<String> = repo
            .list_by_kind(RosterKind::Teacher)
            .unwrap()
            .iter()
            .map(|e| e.profile().first_name.clone())
            .collect();
        assert_eq!(names, vec!["Second", "Third"]);
    }

    #[test]
    fn test_save_import_is_atomic() {
        let repo = setup_repo();
        let entities = vec![teacher("dup", "John"), teacher("dup", "Jane")];

        let err = repo.save_import(&batch("b-1", 2), &entities).unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));

        assert!(repo.find_batch("b-1").unwrap().is_none());
        assert_eq!(repo.count_by_kind(RosterKind::Teacher).unwrap(), 0);
    }

    #[test]
    fn test_find_batch() {
        let repo = setup_repo();
        let original = batch("b-7", 1);
        repo.save_import(&original, &[teacher("t-1", "John")]).unwrap();

        let found = repo.find_batch("b-7").unwrap().unwrap();
        assert_eq!(found.kind, RosterKind::Teacher);
        assert_eq!(found.file_name.as_deref(), Some("teachers.xlsx"));
        assert_eq!(found.imported_rows, 1);
        assert_eq!(found.imported_at.timestamp(), original.imported_at.timestamp());
        assert!(repo.find_batch("missing").unwrap().is_none());
    }
}
