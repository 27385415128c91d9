use crate::{
    api::{balance, employee, leave_request, team},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let submit_limiter = Arc::new(build_limiter(config.rate_submit_per_min));
    let api_limiter = Arc::new(build_limiter(config.rate_api_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(api_limiter) // rate limiting
            .service(
                web::scope("/leave")
                    // /leave — submissions carry their own, stricter limiter
                    .service(
                        web::resource("")
                            .wrap(submit_limiter.clone())
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // /leave/{id}
                    .service(
                        web::resource("/{id}").route(web::get().to(leave_request::get_leave)),
                    )
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave)),
                    )
                    // /leave/{id}/cancel
                    .service(
                        web::resource("/{id}/cancel")
                            .route(web::put().to(leave_request::cancel_leave)),
                    ),
            )
            .service(
                web::scope("/balance")
                    // /balance/{employee_id}
                    .service(
                        web::resource("/{employee_id}").route(web::get().to(balance::get_balance)),
                    ),
            )
            .service(
                web::scope("/employee")
                    // /employee
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employee/{id}
                    .service(web::resource("/{id}").route(web::get().to(employee::get_employee))),
            )
            .service(
                web::scope("/team")
                    // /team
                    .service(web::resource("").route(web::post().to(team::create_team)))
                    // /team/{id}
                    .service(web::resource("/{id}").route(web::get().to(team::get_team)))
                    // /team/{id}/capacity
                    .service(
                        web::resource("/{id}/capacity").route(web::get().to(team::team_capacity)),
                    ),
            ),
    );
}

// SUBMIT
//  └─ POST /leave  → pending + ledger reservation, or the violation list
//
// REVIEW
//  ├─ PUT /leave/{id}/approve  → reservation becomes permanent
//  └─ PUT /leave/{id}/reject   → reservation released (notes mandatory)
//
// OWNER
//  └─ PUT /leave/{id}/cancel   → reservation released (pending only)
