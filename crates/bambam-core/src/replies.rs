//! Fixed reply templates sent back to the chat (Telegram HTML).

use crate::formatting::escape_html;

pub const BOT_VERSION: &str = "v0.3";

pub const UNKNOWN_COMMAND: &str = "Vai dá não <b>MUTANTE</b>, pois esse comando não existe!!!";
pub const MEMBER_NOT_FOUND: &str = "Usuário não encontrado na base de dados do <b>MUTANTE!</b>";
pub const BAN_DENIED: &str = "Só monstros podem dar BAN, seu frango!\nVai pro Mural dos Frangos agora.";
pub const KICK_DENIED: &str = "/kick é para os monstros, seu frango!\nVai pro Mural dos Frangos agora.";
pub const FAREWELL: &str = "<b>Vá com DEUS!!!</b>";

pub fn welcome() -> String {
    format!("<b>Fala FRANGO, seja bem vindo cumpade!</b>\n\n{BOT_VERSION}")
}

pub fn banned(username: &str) -> String {
    format!(
        "<b>{}</b>, quer subir em árvore porra?!\nTomou ban pra largar de ser frango.\nBIRLLLLLLLLLL!!!",
        escape_html(username)
    )
}

pub fn kicked(username: &str) -> String {
    format!("<b>{}</b> Kickado!\nBIRLLLLLLLLLL!!!", escape_html(username))
}

pub fn admin_list<S: AsRef<str>>(names: &[S]) -> String {
    let joined = names
        .iter()
        .map(|n| escape_html(n.as_ref()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("<b>Admins: </b>{joined}")
}

// ============== Trigger phrases ==============

pub const TRIGGER_NAO_VAI_DAR: &str = "<b>QUE NÃO VAI DAR!\nSAÍ DE CASA COMI PRA CARALHO PORRA!</b>";
pub const TRIGGER_KKKK: &str = "<b>Bora cumpade!\nSegura o maluco que tá doente! kkkkkkkkkkkk</b>";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_escape_the_username() {
        assert!(banned("<x>").starts_with("<b>&lt;x&gt;</b>"));
        assert!(kicked("bob").starts_with("<b>bob</b> Kickado!"));
    }

    #[test]
    fn admin_list_joins_names() {
        assert_eq!(admin_list(&["ana", "beto"]), "<b>Admins: </b>ana, beto");
        assert_eq!(admin_list::<&str>(&[]), "<b>Admins: </b>");
    }

    #[test]
    fn welcome_carries_version() {
        assert!(welcome().ends_with(BOT_VERSION));
    }
}
