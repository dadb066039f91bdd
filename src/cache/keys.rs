use sha2::{Digest, Sha256};

/// 缓存键命名空间前缀
pub const CACHE_PREFIX: &str = "quickpost";

/// 查询串摘要长度，取SHA-256十六进制的前12位
const QUERY_HASH_LEN: usize = 12;

/// 将模板中的 {name} 占位符替换为对应值
/// 未匹配的占位符原样保留，由测试阶段的模板校验兜底
pub fn resolve_template(template: &str, params: &[(&str, &str)]) -> String {
    let mut resolved = template.to_string();
    for (name, value) in params {
        let placeholder = format!("{{{}}}", name);
        if resolved.contains(&placeholder) {
            resolved = resolved.replace(&placeholder, value);
        }
    }
    resolved
}

/// 对原始查询串取内容摘要，作为缓存键的附加段
pub fn hash_query(query: &str) -> String {
    let digest = Sha256::digest(query.as_bytes());
    format!("{:x}", digest)[..QUERY_HASH_LEN].to_string()
}

/// 生成完整缓存键：{前缀}:{模板解析结果}[:{查询摘要}]
pub fn build_cache_key(template: &str, params: &[(&str, &str)], query: &str) -> String {
    let resolved = resolve_template(template, params);
    if query.is_empty() {
        format!("{}:{}", CACHE_PREFIX, resolved)
    } else {
        format!("{}:{}:{}", CACHE_PREFIX, resolved, hash_query(query))
    }
}

/// 解析失效模式并补全命名空间前缀
pub fn resolve_pattern(pattern: &str, params: &[(&str, &str)]) -> String {
    let resolved = resolve_template(pattern, params);
    if resolved.starts_with(&format!("{}:", CACHE_PREFIX)) {
        resolved
    } else {
        format!("{}:{}", CACHE_PREFIX, resolved)
    }
}

/// 提取模板中的全部占位符名
/// 路由配置测试用它确保每个占位符都能被请求上下文填充
pub fn template_placeholders(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start + 1..].find('}') else {
            break;
        };
        names.push(rest[start + 1..start + 1 + len].to_string());
        rest = &rest[start + 1 + len + 1..];
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_path_params_and_user_id() {
        let key = resolve_template(
            "posts:detail:{slug}:{user_id}",
            &[("slug", "my-post"), ("user_id", "anon")],
        );
        assert_eq!(key, "posts:detail:my-post:anon");
    }

    #[test]
    fn unmatched_placeholders_are_left_as_is() {
        let key = resolve_template("posts:detail:{slug}:{user_id}", &[("user_id", "anon")]);
        assert_eq!(key, "posts:detail:{slug}:anon");
    }

    #[test]
    fn key_is_deterministic() {
        let params = [("slug", "my-post"), ("user_id", "u-1")];
        let a = build_cache_key("posts:detail:{slug}:{user_id}", &params, "page=1&limit=10");
        let b = build_cache_key("posts:detail:{slug}:{user_id}", &params, "page=1&limit=10");
        assert_eq!(a, b);
        assert!(a.starts_with("quickpost:posts:detail:my-post:u-1:"));
    }

    #[test]
    fn query_string_changes_the_hash_segment() {
        let params = [("user_id", "anon")];
        let a = build_cache_key("posts:list:{user_id}", &params, "page=1");
        let b = build_cache_key("posts:list:{user_id}", &params, "page=2");
        assert_ne!(a, b);
        let (a_base, a_hash) = a.rsplit_once(':').unwrap();
        let (b_base, b_hash) = b.rsplit_once(':').unwrap();
        assert_eq!(a_base, b_base);
        assert_ne!(a_hash, b_hash);
        assert_eq!(a_hash.len(), 12);
    }

    #[test]
    fn empty_query_omits_the_hash_segment() {
        let key = build_cache_key("posts:list:{user_id}", &[("user_id", "anon")], "");
        assert_eq!(key, "quickpost:posts:list:anon");
    }

    #[test]
    fn pattern_gets_prefixed_once() {
        let pattern = resolve_pattern("posts:list:*", &[]);
        assert_eq!(pattern, "quickpost:posts:list:*");
        let already = resolve_pattern("quickpost:posts:list:*", &[]);
        assert_eq!(already, "quickpost:posts:list:*");
    }

    #[test]
    fn pattern_placeholders_are_resolved() {
        let pattern = resolve_pattern("posts:detail:{slug}:*", &[("slug", "my-post")]);
        assert_eq!(pattern, "quickpost:posts:detail:my-post:*");
    }

    #[test]
    fn extracts_placeholder_names() {
        assert_eq!(
            template_placeholders("posts:detail:{slug}:{user_id}"),
            vec!["slug".to_string(), "user_id".to_string()]
        );
        assert!(template_placeholders("posts:list:*").is_empty());
    }
}
