//! Client intake flow: service, optional sub-service, then the branch's
//! questions one by one.

use dispatch::{NotificationEvent, Party};
use domain::{Answer, BranchKey, OrderDetails, Question};
use store::Store;

use crate::engine::{ConversationEngine, Step, Turn};
use crate::error::EngineError;
use crate::lexicon;
use crate::reply::Reply;
use crate::screens;
use crate::session::DialogueState;

impl<S: Store> ConversationEngine<S> {
    pub(crate) fn start_intake(&self, turn: &mut Turn) -> Step {
        turn.session.reset();
        turn.session.transition(DialogueState::ChoosingService);
        turn.reply(screens::service_menu(&self.catalog));
        Ok(())
    }

    pub(crate) fn select_service(&self, turn: &mut Turn, key: &str) -> Step {
        if turn.session.state != DialogueState::ChoosingService {
            turn.stale();
            return Ok(());
        }
        let Some(service) = self.catalog.service(key) else {
            turn.stale();
            return Ok(());
        };

        if service.has_sub_services() {
            turn.session.transition(DialogueState::ChoosingSubService {
                service: service.key.clone(),
            });
            turn.reply(screens::sub_service_menu(service));
            return Ok(());
        }
        self.begin_questions(turn, BranchKey::service(&service.key))
    }

    pub(crate) fn select_sub_service(&self, turn: &mut Turn, key: &str) -> Step {
        let service = match &turn.session.state {
            DialogueState::ChoosingSubService { service } => service.clone(),
            _ => {
                turn.stale();
                return Ok(());
            }
        };
        if self.catalog.sub_service(&service, key).is_none() {
            turn.stale();
            return Ok(());
        }
        self.begin_questions(turn, BranchKey::sub_service(service, key))
    }

    fn questions(&self, branch: &BranchKey) -> Result<&[Question], EngineError> {
        self.catalog.questions(branch).ok_or_else(|| {
            EngineError::Configuration(format!("no questions configured for branch {branch}"))
        })
    }

    fn begin_questions(&self, turn: &mut Turn, branch: BranchKey) -> Step {
        let questions = self.questions(&branch)?;
        let Some(first) = questions.first() else {
            return Err(EngineError::Configuration(format!(
                "no questions configured for branch {branch}"
            )));
        };
        turn.reply(screens::question(first, 0, questions.len()));
        turn.session.answers.clear();
        turn.session
            .transition(DialogueState::AnsweringQuestions { branch, index: 0 });
        Ok(())
    }

    #[tracing::instrument(skip(self, turn, text), fields(user_id = %turn.user))]
    pub(crate) async fn answer(
        &self,
        turn: &mut Turn,
        branch: BranchKey,
        index: usize,
        text: String,
    ) -> Step {
        if text.is_empty() {
            turn.reply(Reply::text(lexicon::EXPECTED_TEXT));
            return Ok(());
        }
        let questions = self.questions(&branch)?;
        let Some(question) = questions.get(index) else {
            return Err(EngineError::Configuration(format!(
                "branch {branch} has no question {index}"
            )));
        };
        turn.session.answers.push(Answer {
            key: question.key.clone(),
            question: question.text.clone(),
            text,
        });

        let next = index + 1;
        if let Some(question) = questions.get(next) {
            turn.reply(screens::question(question, next, questions.len()));
            turn.session.transition(DialogueState::AnsweringQuestions {
                branch,
                index: next,
            });
            return Ok(());
        }
        self.finalize(turn, branch).await
    }

    /// Stores the completed order and announces it.
    async fn finalize(&self, turn: &mut Turn, branch: BranchKey) -> Step {
        let service = self.catalog.service(branch.service_key()).ok_or_else(|| {
            EngineError::Configuration(format!("unknown service in branch {branch}"))
        })?;
        let sub_service_label = match branch.sub_service_key() {
            Some(sub) => Some(
                self.catalog
                    .sub_service(branch.service_key(), sub)
                    .ok_or_else(|| {
                        EngineError::Configuration(format!(
                            "unknown sub-service in branch {branch}"
                        ))
                    })?
                    .label
                    .clone(),
            ),
            None => None,
        };

        let answers = std::mem::take(&mut turn.session.answers);
        let details = OrderDetails {
            service_key: service.key.clone(),
            service_label: service.label.clone(),
            sub_service_key: branch.sub_service_key().map(str::to_string),
            sub_service_label: sub_service_label.clone(),
            answers: answers.clone(),
        };
        let order_id = self.store.add_order(turn.user, details).await?;
        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(%order_id, %branch, "order created");

        let display_name = self
            .store
            .get_user(turn.user)
            .await
            .and_then(|user| user.display_name);
        turn.out.notify(NotificationEvent::OrderCreated {
            order_id: order_id.clone(),
            client: Party {
                id: turn.user,
                display_name,
            },
            service_label: service.label.clone(),
            sub_service_label,
            answers,
        });
        turn.reply(screens::order_accepted(&order_id));
        turn.session.reset();
        Ok(())
    }
}
