// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）和中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"en" 或 "zh-CN"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 语言环境变量
pub const LOCALE_ENV: &str = "SCHOOL_ROSTER_LOCALE";

/// 将用户输入的语言代码解析为已提供翻译的语言
///
/// 不区分大小写，"_" 等同 "-"（例如 zh_CN、zh-Hans、en-US）
pub fn resolve_locale(value: &str) -> Option<&'static str> {
    let normalized = value.trim().replace('_', "-").to_lowercase();
    match normalized.as_str() {
        "en" | "en-us" | "en-gb" => Some("en"),
        "zh" | "zh-cn" | "zh-hans" => Some("zh-CN"),
        _ => None,
    }
}

/// 从环境变量设置语言（未设置或不支持则保持默认）
pub fn init_from_env() {
    let Ok(requested) = std::env::var(LOCALE_ENV) else {
        return;
    };
    match resolve_locale(&requested) {
        Some(locale) => set_locale(locale),
        None => tracing::warn!(
            requested = %requested,
            fallback = %current_locale(),
            "不支持的语言，保持默认"
        ),
    }
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use school_roster::i18n::t;
/// let msg = t("import.failed");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use school_roster::i18n::t_with_args;
/// let msg = t_with_args("import.no_rows", &[("kind", "student")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

// rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
// 为避免测试互相干扰，这里对 i18n 相关测试串行化。
#[cfg(test)]
pub(crate) static LOCALE_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
