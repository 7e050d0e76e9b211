//! 路由表 - 领域模型
//!
//! 纯配置数据，不依赖 DOM。URL 模式到 (模板, 控制器) 的静态映射，
//! 启动后不可修改。

use std::fmt::Display;

/// 路由表条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    /// URL 模式，`:name` 段为参数
    pub pattern: &'static str,
    /// 模板文件名，相对于模板根路径
    pub template: &'static str,
    /// 控制器名
    pub controller: &'static str,
}

pub const ROUTES: &[RouteEntry] = &[
    RouteEntry {
        pattern: "/hadiths",
        template: "hadiths.html",
        controller: "HadithsCtrl",
    },
    RouteEntry {
        pattern: "/hadith/:hadithId",
        template: "hadith.html",
        controller: "HadithCtrl",
    },
    RouteEntry {
        pattern: "/books",
        template: "books.html",
        controller: "BooksCtrl",
    },
    RouteEntry {
        pattern: "/book/:bookId",
        template: "book.html",
        controller: "BookCtrl",
    },
    RouteEntry {
        pattern: "/persons",
        template: "persons.html",
        controller: "PersonsCtrl",
    },
    RouteEntry {
        pattern: "/person/:personId",
        template: "person.html",
        controller: "PersonCtrl",
    },
    RouteEntry {
        pattern: "/tags",
        template: "tags.html",
        controller: "TagsCtrl",
    },
];

/// 去掉开头的 `/` 与一个可选的结尾 `/` 后切分，空段保留（不匹配任何模式）
fn segments(path: &str) -> Option<std::str::Split<'_, char>> {
    let path = path.strip_prefix('/')?;
    let path = path.strip_suffix('/').unwrap_or(path);
    Some(path.split('/'))
}

impl RouteEntry {
    /// 匹配路径，成功时返回绑定的参数
    pub fn matches(&self, path: &str) -> Option<Vec<(String, String)>> {
        let mut params = Vec::new();
        let mut actual = segments(path)?;

        for expected in segments(self.pattern)? {
            let segment = actual.next()?;
            if segment.is_empty() {
                return None;
            }
            match expected.strip_prefix(':') {
                Some(name) => params.push((name.to_string(), segment.to_string())),
                None if expected == segment => {}
                None => return None,
            }
        }

        // 多余的段不匹配
        if actual.next().is_some() {
            return None;
        }
        Some(params)
    }
}

/// 解析后的路由
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub entry: &'static RouteEntry,
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl ResolvedRoute {
    /// 将 URL path 解析为路由，未命中时返回 None
    pub fn resolve(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        ROUTES.iter().find_map(|entry| {
            entry.matches(path).map(|params| Self {
                entry,
                path: path.to_string(),
                params,
            })
        })
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn controller(&self) -> &'static str {
        self.entry.controller
    }

    pub fn template(&self) -> &'static str {
        self.entry.template
    }
}

impl Display for ResolvedRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.path, self.entry.controller)
    }
}
