//! Localized authentication-flow messages.
//!
//! The catalogue is a static table indexed by [`Locale`] and [`AuthMessage`].
//! The `throttle` message carries a `:seconds` placeholder filled in by
//! [`render`].

use std::fmt;

use serde::Serialize;

/// Supported UI locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "de")]
    De,
    #[serde(rename = "es")]
    Es,
    #[serde(rename = "fr")]
    Fr,
    #[serde(rename = "it")]
    It,
    #[serde(rename = "ja")]
    Ja,
    #[serde(rename = "pt")]
    Pt,
    #[serde(rename = "zh_CN")]
    ZhCn,
}

impl Locale {
    pub const ALL: [Locale; 8] = [
        Locale::En,
        Locale::De,
        Locale::Es,
        Locale::Fr,
        Locale::It,
        Locale::Ja,
        Locale::Pt,
        Locale::ZhCn,
    ];

    /// Locale code as stored in `user_preferences.locale`.
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
            Locale::Es => "es",
            Locale::Fr => "fr",
            Locale::It => "it",
            Locale::Ja => "ja",
            Locale::Pt => "pt",
            Locale::ZhCn => "zh_CN",
        }
    }

    /// Resolve a single language tag (`fr`, `fr-CH`, `zh-CN`, `zh_CN`, `pt-BR`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        let normalized = tag.trim().replace('_', "-").to_ascii_lowercase();
        let primary = normalized.split('-').next().unwrap_or_default();
        match primary {
            "en" => Some(Locale::En),
            "de" => Some(Locale::De),
            "es" => Some(Locale::Es),
            "fr" => Some(Locale::Fr),
            "it" => Some(Locale::It),
            "ja" => Some(Locale::Ja),
            "pt" => Some(Locale::Pt),
            "zh" => Some(Locale::ZhCn),
            _ => None,
        }
    }

    /// Pick the best supported locale from an `Accept-Language` header value.
    ///
    /// Tags are ranked by their `q` weight (default 1.0); ties keep header
    /// order. Falls back to English.
    pub fn negotiate(accept_language: &str) -> Self {
        let mut ranked: Vec<(f32, &str)> = accept_language
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.split(';');
                let tag = pieces.next()?.trim();
                if tag.is_empty() {
                    return None;
                }
                let weight = pieces
                    .filter_map(|p| p.trim().strip_prefix("q="))
                    .find_map(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((weight, tag))
            })
            .collect();

        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        ranked
            .into_iter()
            .filter(|(weight, _)| *weight > 0.0)
            .find_map(|(_, tag)| Locale::from_tag(tag))
            .unwrap_or_default()
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Keys of the authentication message catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMessage {
    Failed,
    Password,
    Throttle,
    LoginSuccess,
    LogoutSuccess,
    Unauthorized,
    TokenExpired,
    TokenInvalid,
    UserNotFound,
    UserInactive,
}

impl AuthMessage {
    pub const ALL: [AuthMessage; 10] = [
        AuthMessage::Failed,
        AuthMessage::Password,
        AuthMessage::Throttle,
        AuthMessage::LoginSuccess,
        AuthMessage::LogoutSuccess,
        AuthMessage::Unauthorized,
        AuthMessage::TokenExpired,
        AuthMessage::TokenInvalid,
        AuthMessage::UserNotFound,
        AuthMessage::UserInactive,
    ];

    /// Catalogue key, e.g. `"token_expired"`.
    pub fn key(self) -> &'static str {
        match self {
            AuthMessage::Failed => "failed",
            AuthMessage::Password => "password",
            AuthMessage::Throttle => "throttle",
            AuthMessage::LoginSuccess => "login_success",
            AuthMessage::LogoutSuccess => "logout_success",
            AuthMessage::Unauthorized => "unauthorized",
            AuthMessage::TokenExpired => "token_expired",
            AuthMessage::TokenInvalid => "token_invalid",
            AuthMessage::UserNotFound => "user_not_found",
            AuthMessage::UserInactive => "user_inactive",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Rows follow [`Locale::ALL`], columns follow [`AuthMessage::ALL`].
const CATALOGUE: [[&str; 10]; 8] = [
    // en
    [
        "These credentials do not match our records.",
        "The provided password is incorrect.",
        "Too many login attempts. Please try again in :seconds seconds.",
        "Login successful.",
        "Logout successful.",
        "Unauthorized.",
        "Your session has expired. Please log in again.",
        "The authentication token is invalid.",
        "User not found.",
        "Your account is inactive. Please contact an administrator.",
    ],
    // de
    [
        "Diese Kombination aus Zugangsdaten wurde nicht in unserer Datenbank gefunden.",
        "Das eingegebene Passwort ist nicht korrekt.",
        "Zu viele Loginversuche. Versuchen Sie es bitte in :seconds Sekunden nochmal.",
        "Anmeldung erfolgreich.",
        "Abmeldung erfolgreich.",
        "Nicht autorisiert.",
        "Ihre Sitzung ist abgelaufen. Bitte melden Sie sich erneut an.",
        "Das Authentifizierungstoken ist ungültig.",
        "Benutzer nicht gefunden.",
        "Ihr Konto ist inaktiv. Bitte wenden Sie sich an einen Administrator.",
    ],
    // es
    [
        "Estas credenciales no coinciden con nuestros registros.",
        "La contraseña ingresada no es correcta.",
        "Demasiados intentos de acceso. Por favor intente nuevamente en :seconds segundos.",
        "Inicio de sesión exitoso.",
        "Cierre de sesión exitoso.",
        "No autorizado.",
        "Su sesión ha expirado. Por favor, inicie sesión de nuevo.",
        "El token de autenticación no es válido.",
        "Usuario no encontrado.",
        "Su cuenta está inactiva. Por favor, contacte a un administrador.",
    ],
    // fr
    [
        "Ces identifiants ne correspondent pas à nos enregistrements.",
        "Le mot de passe fourni est incorrect.",
        "Tentatives de connexion trop nombreuses. Veuillez essayer de nouveau dans :seconds secondes.",
        "Connexion réussie.",
        "Déconnexion réussie.",
        "Non autorisé.",
        "Votre session a expiré. Veuillez vous reconnecter.",
        "Le jeton d'authentification est invalide.",
        "Utilisateur introuvable.",
        "Votre compte est inactif. Veuillez contacter un administrateur.",
    ],
    // it
    [
        "Credenziali non valide.",
        "La password non è corretta.",
        "Troppi tentativi di accesso. Riprova tra :seconds secondi.",
        "Accesso effettuato con successo.",
        "Disconnessione effettuata con successo.",
        "Non autorizzato.",
        "La sessione è scaduta. Effettua nuovamente l'accesso.",
        "Il token di autenticazione non è valido.",
        "Utente non trovato.",
        "Il tuo account non è attivo. Contatta un amministratore.",
    ],
    // ja
    [
        "認証情報が記録と一致しません。",
        "パスワードが正しくありません。",
        "ログインの試行回数が多すぎます。:seconds 秒後にお試しください。",
        "ログインしました。",
        "ログアウトしました。",
        "認証されていません。",
        "セッションの有効期限が切れました。再度ログインしてください。",
        "認証トークンが無効です。",
        "ユーザーが見つかりません。",
        "アカウントが無効です。管理者にお問い合わせください。",
    ],
    // pt
    [
        "Essas credenciais não correspondem aos nossos registros.",
        "A senha informada está incorreta.",
        "Muitas tentativas de login. Tente novamente em :seconds segundos.",
        "Login realizado com sucesso.",
        "Logout realizado com sucesso.",
        "Não autorizado.",
        "Sua sessão expirou. Faça login novamente.",
        "O token de autenticação é inválido.",
        "Usuário não encontrado.",
        "Sua conta está inativa. Entre em contato com um administrador.",
    ],
    // zh_CN
    [
        "用户名或密码错误。",
        "密码错误。",
        "登录尝试次数过多，请在 :seconds 秒后重试。",
        "登录成功。",
        "退出成功。",
        "未授权。",
        "会话已过期，请重新登录。",
        "认证令牌无效。",
        "用户不存在。",
        "您的账户已停用，请联系管理员。",
    ],
];

/// Raw catalogue entry, placeholders untouched.
pub fn translate(locale: Locale, message: AuthMessage) -> &'static str {
    CATALOGUE[locale.index()][message.index()]
}

/// Catalogue entry with `:seconds` replaced when a value is given.
pub fn render(locale: Locale, message: AuthMessage, seconds: Option<i64>) -> String {
    let template = translate(locale, message);
    match seconds {
        Some(secs) => template.replace(":seconds", &secs.to_string()),
        None => template.to_string(),
    }
}
