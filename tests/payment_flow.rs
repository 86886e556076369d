//! Behavior-driven tests for the orchestrated bill-payment flow.
//!
//! These tests verify HOW the orchestrator sequences the service calls,
//! which failures abort the flow early, and how submission outcomes are
//! reported back to the caller.

use std::sync::{Arc, Mutex};

use billx_core::{
    AssetDetail, BillDefinition, BpayDetails, Currency, EftDetails, ExchangeRate, PaymentError,
    PaymentGateway, PaymentOrchestrator, PaymentRequest, PriceService, QuoteRequest, QuoteResult,
    ServiceError, ServiceFuture, ServiceId, ServiceRegistry, SubmissionReceipt,
    TransactionRequest,
};

// =============================================================================
// Recording gateway stub
// =============================================================================

enum SubmitBehavior {
    Accept { address: String, total_amount: f64 },
    RejectApplication { message: String },
    GarbledResponse,
}

/// Scripted gateway that records every call it receives, in order.
struct RecordingGateway {
    price: f64,
    assets: Vec<AssetDetail>,
    display_name: String,
    submit: SubmitBehavior,
    calls: Mutex<Vec<&'static str>>,
    submitted: Mutex<Option<TransactionRequest>>,
}

impl RecordingGateway {
    fn happy() -> Self {
        Self {
            price: 8000.0,
            assets: vec![btc_detail()],
            display_name: "Sydney Water".to_owned(),
            submit: SubmitBehavior::Accept {
                address: "3FZbgi29cpjq2GjdwV8eyHuJJnkLtktZc5".to_owned(),
                total_amount: 0.125,
            },
            calls: Mutex::new(Vec::new()),
            submitted: Mutex::new(None),
        }
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().expect("call log poisoned").push(call);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("call log poisoned").clone()
    }

    fn submitted(&self) -> Option<TransactionRequest> {
        self.submitted.lock().expect("submission log poisoned").clone()
    }
}

impl PaymentGateway for RecordingGateway {
    fn exchange_rate<'a>(&'a self, _crypto: Currency) -> ServiceFuture<'a, ExchangeRate> {
        Box::pin(async move {
            self.record("exchange_rate");
            Ok(ExchangeRate {
                primary_currency: "BTC".to_owned(),
                secondary_currency: "AUD".to_owned(),
                price: self.price,
                exchange_id: 4242,
                rtx_val: 0.37,
            })
        })
    }

    fn currency_details<'a>(&'a self) -> ServiceFuture<'a, Vec<AssetDetail>> {
        Box::pin(async move {
            self.record("currency_details");
            Ok(self.assets.clone())
        })
    }

    fn biller_name<'a>(&'a self, _code: u32) -> ServiceFuture<'a, String> {
        Box::pin(async move {
            self.record("biller_name");
            Ok(self.display_name.clone())
        })
    }

    fn bank_name<'a>(&'a self, _bsb: &'a str) -> ServiceFuture<'a, String> {
        Box::pin(async move {
            self.record("bank_name");
            Ok(self.display_name.clone())
        })
    }

    fn submit<'a>(
        &'a self,
        transaction: &'a TransactionRequest,
    ) -> ServiceFuture<'a, SubmissionReceipt> {
        Box::pin(async move {
            self.record("submit");
            *self.submitted.lock().expect("submission log poisoned") = Some(transaction.clone());
            match &self.submit {
                SubmitBehavior::Accept {
                    address,
                    total_amount,
                } => Ok(SubmissionReceipt {
                    address: address.clone(),
                    total_amount: *total_amount,
                }),
                SubmitBehavior::RejectApplication { message } => Err(ServiceError::Application {
                    message: message.clone(),
                }),
                SubmitBehavior::GarbledResponse => Err(ServiceError::Decode {
                    url: "https://api.example.test/tran/add".to_owned(),
                    message: "unexpected end of input".to_owned(),
                }),
            }
        })
    }
}

/// Payment-capable registry entry backed by a shared recording gateway.
struct PayCapableService {
    gateway: Arc<RecordingGateway>,
}

impl PriceService for PayCapableService {
    fn id(&self) -> ServiceId {
        ServiceId::PaidByCoins
    }

    fn quote<'a>(&'a self, _req: &'a QuoteRequest) -> ServiceFuture<'a, Vec<QuoteResult>> {
        Box::pin(async move { Ok(Vec::new()) })
    }

    fn payments(&self) -> Option<&dyn PaymentGateway> {
        Some(self.gateway.as_ref())
    }
}

struct QuoteOnlyService {
    id: ServiceId,
}

impl PriceService for QuoteOnlyService {
    fn id(&self) -> ServiceId {
        self.id
    }

    fn quote<'a>(&'a self, _req: &'a QuoteRequest) -> ServiceFuture<'a, Vec<QuoteResult>> {
        Box::pin(async move { Ok(Vec::new()) })
    }
}

fn btc_detail() -> AssetDetail {
    AssetDetail {
        short_form: "BTC".to_owned(),
        asset_type: "Bitcoin".to_owned(),
        transaction_charge: 2.0,
        brokerage_percent: 1.1,
        gst_percent: 10.0,
    }
}

fn btc_request() -> PaymentRequest {
    PaymentRequest::new(
        1000.0,
        Currency::Aud,
        Currency::Btc,
        ServiceId::PaidByCoins,
        "user@example.test",
    )
    .expect("valid request")
}

fn water_bill() -> BillDefinition {
    BillDefinition::bpay(
        "water",
        BpayDetails {
            code: 93880,
            reference: "5461497013987".to_owned(),
        },
    )
    .expect("valid bill")
}

fn strata_bill() -> BillDefinition {
    BillDefinition::eft(
        "strata",
        EftDetails {
            bsb: "062-692".to_owned(),
            account_number: "12345678".to_owned(),
            account_name: "Strata Plan 1234".to_owned(),
            remitter: Some("Unit 7".to_owned()),
        },
    )
    .expect("valid bill")
}

// =============================================================================
// Happy paths
// =============================================================================

#[tokio::test]
async fn bpay_payment_runs_every_step_in_order() {
    // Given: a registered payment-capable service
    let gateway = Arc::new(RecordingGateway::happy());
    let registry = Arc::new(ServiceRegistry::new(vec![Arc::new(PayCapableService {
        gateway: gateway.clone(),
    })]));

    // When: a saved BPAY bill is paid
    let result = PaymentOrchestrator::new(registry)
        .pay(&btc_request(), &water_bill())
        .await
        .expect("payment should succeed");

    // Then: the steps ran in order and the receipt is surfaced
    assert_eq!(
        gateway.calls(),
        vec!["exchange_rate", "currency_details", "biller_name", "submit"]
    );
    assert_eq!(result.address, "3FZbgi29cpjq2GjdwV8eyHuJJnkLtktZc5");
    assert_eq!(result.amount.value(), 0.125);

    let transaction = gateway.submitted().expect("a transaction was submitted");
    assert_eq!(transaction.biller_code, Some(93880));
    assert_eq!(transaction.biller_name.as_deref(), Some("Sydney Water"));
    assert_eq!(transaction.total_amount, "0.12500");
    assert_eq!(transaction.email, "user@example.test");
    assert_eq!(transaction.quote_exchange_id, 4242);
}

#[tokio::test]
async fn eft_payment_resolves_the_bank_branch_instead_of_a_biller() {
    // Given: a payment-capable gateway
    let gateway = RecordingGateway::happy();
    let bill = strata_bill();

    // When: a direct-deposit bill is paid
    PaymentOrchestrator::execute(
        &gateway,
        &btc_request(),
        bill.payload().expect("usable bill"),
    )
    .await
    .expect("payment should succeed");

    // Then: the bank branch was looked up, not a biller
    assert_eq!(
        gateway.calls(),
        vec!["exchange_rate", "currency_details", "bank_name", "submit"]
    );
    let transaction = gateway.submitted().expect("a transaction was submitted");
    assert_eq!(transaction.bsb.as_deref(), Some("062-692"));
    assert_eq!(transaction.bsb_name.as_deref(), Some("Sydney Water"));
    assert_eq!(transaction.account_no.as_deref(), Some("12345678"));
    assert_eq!(transaction.description.as_deref(), Some("Unit 7"));
    assert_eq!(transaction.biller_code, None);
}

// =============================================================================
// Early aborts
// =============================================================================

#[tokio::test]
async fn malformed_bills_fail_before_any_service_call() {
    // Given: one bill carrying both payloads and one carrying neither
    let gateway = Arc::new(RecordingGateway::happy());
    let registry = Arc::new(ServiceRegistry::new(vec![Arc::new(PayCapableService {
        gateway: gateway.clone(),
    })]));
    let ambiguous = BillDefinition {
        name: "ambiguous".to_owned(),
        bpay: water_bill().bpay,
        eft: strata_bill().eft,
    };
    let empty = BillDefinition {
        name: "empty".to_owned(),
        bpay: None,
        eft: None,
    };

    // When: a payment is attempted against each
    let orchestrator = PaymentOrchestrator::new(registry);
    let first = orchestrator
        .pay(&btc_request(), &ambiguous)
        .await
        .expect_err("ambiguous bills must fail");
    let second = orchestrator
        .pay(&btc_request(), &empty)
        .await
        .expect_err("empty bills must fail");

    // Then: both fail on the bill itself and the flow never touched the service
    assert!(matches!(first, PaymentError::Bill(_)));
    assert!(matches!(second, PaymentError::Bill(_)));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn unsupported_assets_stop_the_flow_before_the_name_lookup() {
    // Given: a gateway that does not list BTC
    let gateway = RecordingGateway {
        assets: vec![AssetDetail {
            short_form: "ETH".to_owned(),
            asset_type: "Ether".to_owned(),
            transaction_charge: 0.0,
            brokerage_percent: 0.0,
            gst_percent: 0.0,
        }],
        ..RecordingGateway::happy()
    };

    // When: a BTC payment is attempted
    let error = PaymentOrchestrator::execute(
        &gateway,
        &btc_request(),
        water_bill().payload().expect("usable bill"),
    )
    .await
    .expect_err("unsupported asset must fail");

    // Then: the flow stopped right after the asset listing
    assert!(matches!(
        error,
        PaymentError::UnsupportedAsset {
            crypto: Currency::Btc
        }
    ));
    assert_eq!(gateway.calls(), vec!["exchange_rate", "currency_details"]);
}

#[tokio::test]
async fn unknown_biller_codes_stop_the_flow_before_submission() {
    // Given: a gateway that cannot resolve the biller
    let gateway = RecordingGateway {
        display_name: "  ".to_owned(),
        ..RecordingGateway::happy()
    };

    // When: the payment is attempted
    let error = PaymentOrchestrator::execute(
        &gateway,
        &btc_request(),
        water_bill().payload().expect("usable bill"),
    )
    .await
    .expect_err("unknown biller must fail");

    // Then: nothing was submitted
    assert!(matches!(
        error,
        PaymentError::TargetNotFound { target: "biller", .. }
    ));
    assert!(!gateway.calls().contains(&"submit"));
}

#[tokio::test]
async fn non_positive_rates_never_reach_submission() {
    // Given: a gateway quoting a zero rate
    let gateway = RecordingGateway {
        price: 0.0,
        ..RecordingGateway::happy()
    };

    // When: the payment is attempted
    let error = PaymentOrchestrator::execute(
        &gateway,
        &btc_request(),
        water_bill().payload().expect("usable bill"),
    )
    .await
    .expect_err("zero rate must fail");

    // Then: the flow stopped at the rate step
    assert!(matches!(error, PaymentError::RateUnavailable { .. }));
    assert_eq!(gateway.calls(), vec!["exchange_rate"]);
}

// =============================================================================
// Submission outcomes
// =============================================================================

#[tokio::test]
async fn rejected_submissions_surface_the_service_reason() {
    // Given: a gateway that rejects the transaction
    let gateway = RecordingGateway {
        submit: SubmitBehavior::RejectApplication {
            message: "Insufficient balance".to_owned(),
        },
        ..RecordingGateway::happy()
    };

    // When: the payment is attempted
    let error = PaymentOrchestrator::execute(
        &gateway,
        &btc_request(),
        water_bill().payload().expect("usable bill"),
    )
    .await
    .expect_err("rejected submission must fail");

    // Then: the reason comes straight from the service
    match error {
        PaymentError::SubmissionRejected { reason } => {
            assert_eq!(reason, "Insufficient balance");
        }
        other => panic!("expected SubmissionRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn garbled_submission_responses_leave_the_outcome_unknown() {
    // Given: a gateway whose submission response cannot be read
    let gateway = RecordingGateway {
        submit: SubmitBehavior::GarbledResponse,
        ..RecordingGateway::happy()
    };

    // When: the payment is attempted
    let error = PaymentOrchestrator::execute(
        &gateway,
        &btc_request(),
        water_bill().payload().expect("usable bill"),
    )
    .await
    .expect_err("garbled response must fail");

    // Then: the caller is told the payment may have gone through
    assert!(matches!(error, PaymentError::SubmissionStateUnknown { .. }));
    assert!(gateway.submitted().is_some());
}

#[tokio::test]
async fn accepted_submissions_without_an_address_are_rejected() {
    // Given: a gateway that accepts but returns no address to fund
    let gateway = RecordingGateway {
        submit: SubmitBehavior::Accept {
            address: "  ".to_owned(),
            total_amount: 0.125,
        },
        ..RecordingGateway::happy()
    };

    // When: the payment is attempted
    let error = PaymentOrchestrator::execute(
        &gateway,
        &btc_request(),
        water_bill().payload().expect("usable bill"),
    )
    .await
    .expect_err("an address-less acceptance must fail");

    // Then: it is reported as a rejection, not a success
    assert!(matches!(error, PaymentError::SubmissionRejected { .. }));
}

// =============================================================================
// Registry resolution
// =============================================================================

#[tokio::test]
async fn paying_through_an_unregistered_service_fails_cleanly() {
    // Given: a registry that only knows a quote-only service
    let registry = Arc::new(ServiceRegistry::new(vec![Arc::new(QuoteOnlyService {
        id: ServiceId::Bit2Bill,
    })]));

    // When: a payment through a different service is requested
    let error = PaymentOrchestrator::new(registry)
        .pay(&btc_request(), &water_bill())
        .await
        .expect_err("unregistered service must fail");

    // Then: the error names the missing service
    assert!(matches!(
        error,
        PaymentError::ServiceNotRegistered {
            service: ServiceId::PaidByCoins
        }
    ));
}

#[tokio::test]
async fn quote_only_services_cannot_place_payments() {
    // Given: the requested service is registered but quote-only
    let registry = Arc::new(ServiceRegistry::new(vec![Arc::new(QuoteOnlyService {
        id: ServiceId::PaidByCoins,
    })]));

    // When: a payment through it is requested
    let error = PaymentOrchestrator::new(registry)
        .pay(&btc_request(), &water_bill())
        .await
        .expect_err("quote-only service must fail");

    // Then: the error says payments are unsupported there
    assert!(matches!(
        error,
        PaymentError::PaymentsUnsupported {
            service: ServiceId::PaidByCoins
        }
    ));
}
