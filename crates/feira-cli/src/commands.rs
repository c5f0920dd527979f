// SPDX-License-Identifier: AGPL-3.0
// Feira Ofertas CLI - Command Handlers
//
// One handler per operation. Success and failure are reported with the
// same one-line localized messages the web client showed as toasts; error
// detail goes to stderr and prior state is left untouched.

use crate::state::AppState;
use feira_core::{
    AppError, AuthRequest, Offer, OfferDraft, OfferPageQuery, Page, RegisterRequest, Role, User,
};

type CommandResult = Result<(), AppError>;

/// Log in and persist the session
pub async fn login(state: &AppState, email: String, password: String) -> CommandResult {
    let credentials = AuthRequest { email, password };
    let auth = state
        .client
        .login(&credentials)
        .await
        .map_err(|e| fail("Erro ao fazer login", e))?;

    state
        .session
        .login(auth)
        .map_err(|e| fail("Erro ao fazer login", e))?;

    println!("Login realizado com sucesso");
    Ok(())
}

/// Drop the stored session and cached offers
pub fn logout(state: &AppState) -> CommandResult {
    state.session.logout();
    state.offers.cache().clear();
    println!("Sessão encerrada");
    Ok(())
}

/// Create a new account
pub async fn register(
    state: &AppState,
    name: String,
    email: String,
    password: String,
    role: Role,
) -> CommandResult {
    let account = RegisterRequest {
        name,
        email,
        password,
        role,
    };
    let user = state
        .client
        .register(&account)
        .await
        .map_err(|e| fail("Erro ao criar conta", e))?;

    println!("Conta criada com sucesso");
    print_user(&user);
    Ok(())
}

/// Restore the stored session and show the current profile
pub async fn whoami(state: &AppState) -> CommandResult {
    state.session.initialize(&state.client).await;

    match state.session.current_user() {
        Some(user) => {
            print_user(&user);
            Ok(())
        }
        None => {
            eprintln!("Não autenticado");
            Err(AppError::Validation("not authenticated".to_string()))
        }
    }
}

/// List all users
pub async fn list_users(state: &AppState) -> CommandResult {
    let users = state
        .client
        .list_users()
        .await
        .map_err(|e| fail("Erro ao listar usuários", e))?;

    for user in &users {
        print_user(user);
    }
    Ok(())
}

/// Show one user
pub async fn show_user(state: &AppState, id: i64) -> CommandResult {
    let user = state
        .client
        .get_user(id)
        .await
        .map_err(|e| fail("Erro ao buscar usuário", e))?;

    print_user(&user);
    Ok(())
}

/// List public offers
pub async fn list_offers(state: &AppState, query: OfferPageQuery) -> CommandResult {
    let page = state
        .offers
        .list(&query)
        .await
        .map_err(|e| fail("Erro ao listar ofertas", e))?;

    print_page(&page);
    Ok(())
}

/// List the caller's own offers
pub async fn my_offers(state: &AppState, query: OfferPageQuery) -> CommandResult {
    let page = state
        .offers
        .mine(&query)
        .await
        .map_err(|e| fail("Erro ao listar ofertas", e))?;

    print_page(&page);
    Ok(())
}

/// Show one offer
pub async fn show_offer(state: &AppState, id: i64) -> CommandResult {
    let offer = state
        .offers
        .detail(id)
        .await
        .map_err(|e| fail("Erro ao buscar oferta", e))?;

    print_offer(&offer);
    Ok(())
}

/// Create an offer
pub async fn create_offer(state: &AppState, draft: OfferDraft) -> CommandResult {
    let offer = state
        .offers
        .create(&draft)
        .await
        .map_err(|e| fail("Erro ao criar oferta", e))?;

    println!("Oferta criada com sucesso");
    print_offer(&offer);
    Ok(())
}

/// Edit a pending offer
pub async fn update_offer(state: &AppState, id: i64, draft: OfferDraft) -> CommandResult {
    let offer = state
        .offers
        .update(id, &draft)
        .await
        .map_err(|e| fail("Erro ao atualizar oferta", e))?;

    println!("Oferta atualizada com sucesso");
    print_offer(&offer);
    Ok(())
}

/// Delete an offer
pub async fn delete_offer(state: &AppState, id: i64) -> CommandResult {
    state
        .offers
        .delete(id)
        .await
        .map_err(|e| fail("Erro ao excluir oferta", e))?;

    println!("Oferta excluída com sucesso");
    Ok(())
}

/// Approve a pending offer (administrators only, enforced by the backend)
pub async fn approve_offer(state: &AppState, id: i64) -> CommandResult {
    let offer = state
        .offers
        .approve(id)
        .await
        .map_err(|e| fail("Erro ao aprovar oferta", e))?;

    println!("Oferta aprovada com sucesso");
    print_offer(&offer);
    Ok(())
}

/// Reject a pending offer, with an optional reason
pub async fn reject_offer(state: &AppState, id: i64, reason: Option<String>) -> CommandResult {
    let offer = state
        .offers
        .reject(id, reason.as_deref())
        .await
        .map_err(|e| fail("Erro ao rejeitar oferta", e))?;

    println!("Oferta rejeitada com sucesso");
    print_offer(&offer);
    Ok(())
}

fn fail(message: &str, err: AppError) -> AppError {
    eprintln!("{}: {}", message, err);
    err
}

fn print_user(user: &User) {
    println!(
        "#{} {} <{}> [{}]",
        user.id,
        user.name,
        user.email,
        user.role.as_wire()
    );
}

fn print_offer(offer: &Offer) {
    println!(
        "#{} {} - R$ {:.2} x{} [{}] por {}",
        offer.id,
        offer.product_name,
        offer.price,
        offer.quantity,
        offer.status.as_wire(),
        offer.merchant_name
    );
    if !offer.description.is_empty() {
        println!("    {}", offer.description);
    }
    if let Some(admin) = &offer.admin_name {
        println!("    revisado por {}", admin);
    }
}

fn print_page(page: &Page<Offer>) {
    for offer in &page.content {
        print_offer(offer);
    }
    println!(
        "página {}/{} ({} ofertas)",
        page.number + 1,
        page.total_pages.max(1),
        page.total_elements
    );
}
