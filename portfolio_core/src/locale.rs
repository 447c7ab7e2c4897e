//! Operator and visitor facing strings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Es,
}

/// Keys for the fixed strings rendered by the site and the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    StatusRead,
    StatusNew,
    StatusUnread,
    ActionView,
    ActionMark,
    ActionMarkAsRead,
    ActionClose,
    ActionRetry,
    ActionOk,
    ActionLogout,
    ActionLogin,
    ActionLoginGoogle,
    FieldName,
    FieldEmail,
    FieldMessage,
    FieldDate,
    FieldStatus,
    FieldPassword,
    ColumnActions,
    StatsTotal,
    StatsUnread,
    StatsRead,
    NoMessages,
    FeedLoading,
    FeedFailed,
    MarkReadFailed,
    AdminTitle,
    LoginTitle,
    SignedInAs,
    ContactTitle,
    ContactSend,
    ContactSent,
    ContactFailed,
    ContactMissingName,
    ContactMissingEmail,
    ContactMissingMessage,
    NavAbout,
    NavProjects,
    NavContact,
    NavMenu,
    AboutTitle,
    ProjectsTitle,
    FooterRights,
}

impl Locale {
    pub fn lang_tag(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
        }
    }

    pub fn text(self, key: Text) -> &'static str {
        match self {
            Locale::En => english(key),
            Locale::Es => spanish(key),
        }
    }

    pub fn minutes_ago(self, minutes: i64) -> String {
        match self {
            Locale::En => format!("{} minute{} ago", minutes, plural(minutes)),
            Locale::Es => format!("Hace {} minuto{}", minutes, plural(minutes)),
        }
    }

    pub fn hours_ago(self, hours: i64) -> String {
        match self {
            Locale::En => format!("{} hour{} ago", hours, plural(hours)),
            Locale::Es => format!("Hace {} hora{}", hours, plural(hours)),
        }
    }

    /// `month` is 1-based.
    pub fn month_name(self, month: u32) -> &'static str {
        const EN: [&str; 12] = [
            "January", "February", "March", "April", "May", "June", "July", "August",
            "September", "October", "November", "December",
        ];
        const ES: [&str; 12] = [
            "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto",
            "septiembre", "octubre", "noviembre", "diciembre",
        ];
        let index = (month.clamp(1, 12) - 1) as usize;
        match self {
            Locale::En => EN[index],
            Locale::Es => ES[index],
        }
    }

    pub fn absolute_date(self, day: u32, month: u32, year: i32, hour: u32, minute: u32) -> String {
        match self {
            Locale::En => format!(
                "{} {} {}, {:02}:{:02}",
                day,
                self.month_name(month),
                year,
                hour,
                minute
            ),
            Locale::Es => format!(
                "{} de {} de {}, {:02}:{:02}",
                day,
                self.month_name(month),
                year,
                hour,
                minute
            ),
        }
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn english(key: Text) -> &'static str {
    match key {
        Text::StatusRead => "Read",
        Text::StatusNew => "New",
        Text::StatusUnread => "Unread",
        Text::ActionView => "View",
        Text::ActionMark => "Mark",
        Text::ActionMarkAsRead => "Mark as read",
        Text::ActionClose => "Close",
        Text::ActionRetry => "Retry",
        Text::ActionOk => "OK",
        Text::ActionLogout => "Sign out",
        Text::ActionLogin => "Sign in",
        Text::ActionLoginGoogle => "Sign in with Google",
        Text::FieldName => "Name",
        Text::FieldEmail => "Email",
        Text::FieldMessage => "Message",
        Text::FieldDate => "Date",
        Text::FieldStatus => "Status",
        Text::FieldPassword => "Password",
        Text::ColumnActions => "Actions",
        Text::StatsTotal => "Total",
        Text::StatsUnread => "Unread",
        Text::StatsRead => "Read",
        Text::NoMessages => "No messages yet",
        Text::FeedLoading => "Loading messages...",
        Text::FeedFailed => "Messages could not be loaded.",
        Text::MarkReadFailed => "Could not mark the message, try again.",
        Text::AdminTitle => "Messages",
        Text::LoginTitle => "Admin panel",
        Text::SignedInAs => "Signed in as",
        Text::ContactTitle => "Get in touch",
        Text::ContactSend => "Send message",
        Text::ContactSent => "Message sent!",
        Text::ContactFailed => "Could not send, try again.",
        Text::ContactMissingName => "Please enter your name",
        Text::ContactMissingEmail => "Please enter your email",
        Text::ContactMissingMessage => "Please enter a message",
        Text::NavAbout => "About",
        Text::NavProjects => "Projects",
        Text::NavContact => "Contact",
        Text::NavMenu => "Menu",
        Text::AboutTitle => "About me",
        Text::ProjectsTitle => "Projects",
        Text::FooterRights => "All rights reserved.",
    }
}

fn spanish(key: Text) -> &'static str {
    match key {
        Text::StatusRead => "Leído",
        Text::StatusNew => "Nuevo",
        Text::StatusUnread => "No leído",
        Text::ActionView => "Ver",
        Text::ActionMark => "Marcar",
        Text::ActionMarkAsRead => "Marcar como Leído",
        Text::ActionClose => "Cerrar",
        Text::ActionRetry => "Reintentar",
        Text::ActionOk => "Aceptar",
        Text::ActionLogout => "Cerrar sesión",
        Text::ActionLogin => "Iniciar sesión",
        Text::ActionLoginGoogle => "Continuar con Google",
        Text::FieldName => "Nombre",
        Text::FieldEmail => "Email",
        Text::FieldMessage => "Mensaje",
        Text::FieldDate => "Fecha",
        Text::FieldStatus => "Estado",
        Text::FieldPassword => "Contraseña",
        Text::ColumnActions => "Acciones",
        Text::StatsTotal => "Total",
        Text::StatsUnread => "No leídos",
        Text::StatsRead => "Leídos",
        Text::NoMessages => "No hay mensajes todavía",
        Text::FeedLoading => "Cargando mensajes...",
        Text::FeedFailed => "No se pudieron cargar los mensajes.",
        Text::MarkReadFailed => "Error al marcar el mensaje. Intenta de nuevo.",
        Text::AdminTitle => "Mensajes",
        Text::LoginTitle => "Panel de administración",
        Text::SignedInAs => "Sesión iniciada como",
        Text::ContactTitle => "Contacto",
        Text::ContactSend => "Enviar mensaje",
        Text::ContactSent => "¡Mensaje enviado correctamente!",
        Text::ContactFailed => "Error al enviar. Intenta de nuevo.",
        Text::ContactMissingName => "Introduce tu nombre",
        Text::ContactMissingEmail => "Introduce tu correo",
        Text::ContactMissingMessage => "Escribe un mensaje",
        Text::NavAbout => "Sobre mí",
        Text::NavProjects => "Proyectos",
        Text::NavContact => "Contacto",
        Text::NavMenu => "Menú",
        Text::AboutTitle => "Sobre mí",
        Text::ProjectsTitle => "Proyectos",
        Text::FooterRights => "Todos los derechos reservados.",
    }
}
