//! 応答・ログに出すメッセージから秘密情報を伏せる

/// 秘密文字列を `***` に置き換える
///
/// 短い秘密（`SHORT_SECRET_CHARS` 文字未満）は英数字に挟まれていない出現だけを伏せる。
/// 単語の一部まで伏せるとメッセージが読めなくなる。
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    secrets: Vec<String>,
}

impl Redactor {
    const MASK: &'static str = "***";
    const SHORT_SECRET_CHARS: usize = 4;

    pub fn new(secrets: impl IntoIterator<Item = String>) -> Self {
        let mut r = Self::default();
        r.extend(secrets);
        r
    }

    /// 秘密を追加する。空文字列は無視する。
    pub fn extend(&mut self, secrets: impl IntoIterator<Item = String>) {
        self.secrets
            .extend(secrets.into_iter().filter(|s| !s.is_empty()));
        // 長いものから置換しないと、部分文字列が先に伏せられて残りが漏れる
        self.secrets
            .sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        self.secrets.dedup();
    }

    pub fn redact(&self, message: &str) -> String {
        let mut out = message.to_string();
        for s in &self.secrets {
            if !out.contains(s.as_str()) {
                continue;
            }
            out = if s.chars().count() < Self::SHORT_SECRET_CHARS {
                Self::replace_standalone(&out, s)
            } else {
                out.replace(s.as_str(), Self::MASK)
            };
        }
        out
    }

    fn replace_standalone(text: &str, secret: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for (i, _) in text.match_indices(secret) {
            let end = i + secret.len();
            let joined = |c: Option<char>| c.map_or(false, char::is_alphanumeric);
            if joined(text[..i].chars().next_back()) || joined(text[end..].chars().next()) {
                continue;
            }
            out.push_str(&text[last..i]);
            out.push_str(Self::MASK);
            last = end;
        }
        out.push_str(&text[last..]);
        out
    }
}
