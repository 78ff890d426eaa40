//! Barra de navegación con el menú estático del sitio

use askama::Template;

pub const LOGO_URL: &str = "https://www.kusadasi.biz/logoLight.png";

#[derive(Debug, Clone, Copy)]
pub struct MenuItem {
    pub name: &'static str,
    pub href: &'static str,
    pub current: bool,
}

pub const MENU_ITEMS: [MenuItem; 5] = [
    MenuItem { name: "Home", href: "/", current: true },
    MenuItem { name: "Kusadasi", href: "https://www.kusadasi.biz/info/", current: false },
    MenuItem { name: "Ephesus", href: "https://www.kusadasi.biz/ephesus/", current: false },
    MenuItem { name: "Around", href: "https://www.kusadasi.biz/misc/", current: false },
    MenuItem { name: "Contact", href: "https://www.kusadasi.biz/misc/contact/", current: false },
];

/// Barra de navegación (escritorio + menú móvil desplegable)
#[derive(Template)]
#[template(path = "navigation.html")]
pub struct NavigationTemplate {
    pub logo_url: &'static str,
    pub menu_items: &'static [MenuItem],
}

impl Default for NavigationTemplate {
    fn default() -> Self {
        Self {
            logo_url: LOGO_URL,
            menu_items: &MENU_ITEMS,
        }
    }
}
