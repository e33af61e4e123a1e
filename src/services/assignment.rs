// src/services/assignment.rs

use std::collections::HashMap;
use std::str::FromStr;

use crate::{common::error::AppError, models::auth::User};

/// Política de atribuição de leads. As duas variantes NÃO são equivalentes:
/// o rodízio distribui por identidade, a menor carga olha o volume atual.
/// Selecionada via ASSIGNMENT_POLICY no ambiente.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssignmentPolicy {
    #[default]
    RoundRobinById,
    LeastLoaded,
}

impl FromStr for AssignmentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "round_robin" | "round_robin_by_id" => Ok(AssignmentPolicy::RoundRobinById),
            "least_loaded" => Ok(AssignmentPolicy::LeastLoaded),
            other => Err(format!("política de atribuição desconhecida: '{}'", other)),
        }
    }
}

/// Rodízio por id: dado o vendedor da atribuição mais recente, devolve o
/// próximo da lista (ordenada por id crescente), com volta ao início.
///
/// - Sem atribuição anterior: o menor id recebe o lead.
/// - Vendedor anterior fora da lista (desativado/removido): recomeça do
///   menor id.
pub fn next_in_rotation<'a>(
    vendedores: &'a [User],
    ultimo_vendedor_id: Option<i32>,
) -> Result<&'a User, AppError> {
    if vendedores.is_empty() {
        return Err(AppError::NoEligibleSellers);
    }

    let proximo = match ultimo_vendedor_id {
        None => &vendedores[0],
        Some(id) => match vendedores.iter().position(|v| v.id == id) {
            Some(p) => &vendedores[(p + 1) % vendedores.len()],
            None => &vendedores[0],
        },
    };

    Ok(proximo)
}

/// Menor carga: devolve o vendedor com menos leads atribuídos. Vendedor sem
/// entrada no mapa conta como zero; empate fica com o menor id.
pub fn least_loaded<'a>(
    vendedores: &'a [User],
    contagens: &HashMap<i32, i64>,
) -> Result<&'a User, AppError> {
    let mut melhor = vendedores.first().ok_or(AppError::NoEligibleSellers)?;
    let mut menor_carga = contagens.get(&melhor.id).copied().unwrap_or(0);

    for vendedor in &vendedores[1..] {
        let carga = contagens.get(&vendedor.id).copied().unwrap_or(0);
        if carga < menor_carga {
            melhor = vendedor;
            menor_carga = carga;
        }
    }

    Ok(melhor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;
    use chrono::Utc;

    fn vendedor(id: i32) -> User {
        User {
            id,
            name: format!("Vendedor {}", id),
            email: format!("vendedor{}@settesaude.com.br", id),
            role: Role::Seller,
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn sem_historico_atribui_ao_menor_id() {
        let vendedores = vec![vendedor(2), vendedor(3), vendedor(7)];
        let escolhido = next_in_rotation(&vendedores, None).unwrap();
        assert_eq!(escolhido.id, 2);
    }

    #[test]
    fn avanca_para_o_proximo_da_lista() {
        let vendedores = vec![vendedor(2), vendedor(3), vendedor(7)];
        let escolhido = next_in_rotation(&vendedores, Some(2)).unwrap();
        assert_eq!(escolhido.id, 3);
    }

    #[test]
    fn da_a_volta_apos_o_ultimo() {
        let vendedores = vec![vendedor(2), vendedor(3), vendedor(7)];
        let escolhido = next_in_rotation(&vendedores, Some(7)).unwrap();
        assert_eq!(escolhido.id, 2);
    }

    #[test]
    fn vendedor_unico_recebe_sempre() {
        let vendedores = vec![vendedor(5)];
        assert_eq!(next_in_rotation(&vendedores, None).unwrap().id, 5);
        assert_eq!(next_in_rotation(&vendedores, Some(5)).unwrap().id, 5);
    }

    #[test]
    fn vendedor_removido_reinicia_do_menor_id() {
        let vendedores = vec![vendedor(2), vendedor(3)];
        // id 9 não está mais na lista de elegíveis
        let escolhido = next_in_rotation(&vendedores, Some(9)).unwrap();
        assert_eq!(escolhido.id, 2);
    }

    #[test]
    fn lista_vazia_falha() {
        let vendedores: Vec<User> = vec![];
        assert!(matches!(
            next_in_rotation(&vendedores, None),
            Err(AppError::NoEligibleSellers)
        ));
        assert!(matches!(
            least_loaded(&vendedores, &HashMap::new()),
            Err(AppError::NoEligibleSellers)
        ));
    }

    #[test]
    fn rodizio_distribui_uniformemente() {
        let vendedores = vec![vendedor(1), vendedor(2), vendedor(3)];
        let mut ultimo = None;
        let mut contagem: HashMap<i32, i32> = HashMap::new();

        for _ in 0..9 {
            let escolhido = next_in_rotation(&vendedores, ultimo).unwrap();
            *contagem.entry(escolhido.id).or_default() += 1;
            ultimo = Some(escolhido.id);
        }

        assert!(contagem.values().all(|&c| c == 3));
    }

    #[test]
    fn menor_carga_escolhe_quem_tem_menos_leads() {
        let vendedores = vec![vendedor(1), vendedor(2), vendedor(3)];
        let contagens = HashMap::from([(1, 4), (2, 1), (3, 2)]);
        assert_eq!(least_loaded(&vendedores, &contagens).unwrap().id, 2);
    }

    #[test]
    fn menor_carga_sem_registro_conta_como_zero() {
        let vendedores = vec![vendedor(1), vendedor(2)];
        let contagens = HashMap::from([(1, 3)]);
        assert_eq!(least_loaded(&vendedores, &contagens).unwrap().id, 2);
    }

    #[test]
    fn menor_carga_empate_fica_com_menor_id() {
        let vendedores = vec![vendedor(4), vendedor(9)];
        let contagens = HashMap::from([(4, 2), (9, 2)]);
        assert_eq!(least_loaded(&vendedores, &contagens).unwrap().id, 4);
    }

    #[test]
    fn parse_da_politica() {
        assert_eq!(
            "round_robin".parse::<AssignmentPolicy>().unwrap(),
            AssignmentPolicy::RoundRobinById
        );
        assert_eq!(
            "LEAST_LOADED".parse::<AssignmentPolicy>().unwrap(),
            AssignmentPolicy::LeastLoaded
        );
        assert!("aleatoria".parse::<AssignmentPolicy>().is_err());
    }
}
