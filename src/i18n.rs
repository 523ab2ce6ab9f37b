//! English and Korean UI strings.

use crate::settings::Locale;
use chrono::{DateTime, Datelike, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translations {
    locale: Locale,
}

impl Translations {
    pub fn new(locale: Locale) -> Self {
        Translations { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Looks up `key`, falling back to English and then to the key itself.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        let found: Option<&'a str> = match self.locale {
            Locale::En => english(key),
            Locale::Ko => korean(key).or_else(|| english(key)),
        };
        found.unwrap_or(key)
    }

    /// "1 repository" / "12 repositories".
    pub fn repository_count(&self, count: usize) -> String {
        match (self.locale, count) {
            (Locale::Ko, n) => format!("저장소 {}개", n),
            (Locale::En, 1) => "1 repository".to_string(),
            (Locale::En, n) => format!("{} repositories", n),
        }
    }

    /// Short form used on repository cards, e.g. `Jan 5, 2024`.
    pub fn short_date(&self, date: &DateTime<Utc>) -> String {
        match self.locale {
            Locale::En => date.format("%b %-d, %Y").to_string(),
            Locale::Ko => korean_date(date),
        }
    }

    /// Long form used on the detail page, e.g. `January 5, 2024`.
    pub fn long_date(&self, date: &DateTime<Utc>) -> String {
        match self.locale {
            Locale::En => date.format("%B %-d, %Y").to_string(),
            Locale::Ko => korean_date(date),
        }
    }
}

fn korean_date(date: &DateTime<Utc>) -> String {
    format!("{}년 {}월 {}일", date.year(), date.month(), date.day())
}

/// Digit grouping with commas, `1234567` -> `1,234,567`.
pub fn format_count(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn english(key: &str) -> Option<&'static str> {
    let text = match key {
        "app_title" => "GitHub Repository Explorer",
        "header.language" => "Language",
        "header.light" => "Light mode",
        "header.dark" => "Dark mode",
        "search.placeholder" => "Enter a GitHub username",
        "search.button" => "Search",
        "search.loading" => "Searching...",
        "search.no_results" => "No repositories found",
        "search.back" => "Back to search",
        "filter.title" => "Filter by language",
        "filter.all" => "All",
        "filter.javascript" => "JavaScript",
        "filter.typescript" => "TypeScript",
        "filter.python" => "Python",
        "filter.other" => "Other",
        "sort.title" => "Sort by",
        "sort.updated" => "Last updated",
        "sort.stars" => "Stars",
        "list.load_more" => "Load more",
        "list.end" => "End of repositories",
        "list.show" => "Show repositories",
        "repository.show" => "Show repository",
        "repository.stars" => "Stars",
        "repository.forks" => "Forks",
        "repository.issues" => "Open issues",
        "repository.language" => "Language",
        "repository.last_updated" => "Last updated",
        "repository.view_on_github" => "View on GitHub",
        "errors.user_not_found" => "User not found",
        "errors.repository_not_found" => "Repository not found",
        "errors.fetch_user" => "Failed to fetch user data",
        "errors.fetch_repositories" => "Failed to fetch repositories",
        "errors.fetch_repository" => "Failed to fetch repository details",
        "errors.view_expired" => "This list has expired. Reload the page to fetch it again.",
        _ => return None,
    };
    Some(text)
}

fn korean(key: &str) -> Option<&'static str> {
    let text = match key {
        "app_title" => "GitHub 저장소 탐색기",
        "header.language" => "언어",
        "header.light" => "라이트 모드",
        "header.dark" => "다크 모드",
        "search.placeholder" => "GitHub 사용자 이름을 입력하세요",
        "search.button" => "검색",
        "search.loading" => "검색 중...",
        "search.no_results" => "저장소를 찾을 수 없습니다",
        "search.back" => "검색으로 돌아가기",
        "filter.title" => "언어별 필터",
        "filter.all" => "전체",
        "filter.other" => "기타",
        "sort.title" => "정렬 기준",
        "sort.updated" => "최근 업데이트",
        "sort.stars" => "스타",
        "list.load_more" => "더 보기",
        "list.end" => "마지막 저장소입니다",
        "list.show" => "저장소 보기",
        "repository.show" => "저장소 정보 보기",
        "repository.stars" => "스타",
        "repository.forks" => "포크",
        "repository.issues" => "열린 이슈",
        "repository.language" => "언어",
        "repository.last_updated" => "마지막 업데이트",
        "repository.view_on_github" => "GitHub에서 보기",
        "errors.user_not_found" => "사용자를 찾을 수 없습니다",
        "errors.repository_not_found" => "저장소를 찾을 수 없습니다",
        "errors.fetch_user" => "사용자 정보를 가져오지 못했습니다",
        "errors.fetch_repositories" => "저장소 목록을 가져오지 못했습니다",
        "errors.fetch_repository" => "저장소 정보를 가져오지 못했습니다",
        "errors.view_expired" => "목록이 만료되었습니다. 페이지를 새로고침하세요.",
        _ => return None,
    };
    Some(text)
}
